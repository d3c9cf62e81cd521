//! The CSS selector subset the page markup relies on: type, `#id`, `.class`,
//! `[attr="v"]`, `[attr^="v"]`, the descendant combinator and comma-separated
//! lists. Identifiers follow the CSS start rule, so `#1abc` is rejected the way
//! `querySelectorAll` rejects it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SelectorError;

/// Read access to an element tree, enough to evaluate a [`Selector`].
pub trait ElementTree {
    type Node: Copy;

    fn tag_name(&self, node: Self::Node) -> Option<&str>;
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;
    fn has_class(&self, node: Self::Node, class: &str) -> bool;
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector {
    alternatives: Vec<ComplexSelector>,
}

/// Compounds joined by descendant combinators; the last one is the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    compounds: Vec<CompoundSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    name: String,
    op: AttributeOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeOp {
    Equals(String),
    Prefix(String),
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse()
    }

    pub fn matches<T: ElementTree>(&self, tree: &T, node: T::Node) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches(tree, node))
    }

    /// Id when the selector is a single bare `#id`.
    pub fn as_id(&self) -> Option<&str> {
        match self.alternatives.as_slice() {
            [complex] => match complex.compounds.as_slice() {
                [CompoundSelector {
                    tag: None,
                    id: Some(id),
                    classes,
                    attributes,
                }] if classes.is_empty() && attributes.is_empty() => Some(id.as_str()),
                _ => None,
            },
            _ => None,
        }
    }
}

impl ComplexSelector {
    fn matches<T: ElementTree>(&self, tree: &T, node: T::Node) -> bool {
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !subject.matches(tree, node) {
            return false;
        }

        // Greedy right-to-left walk: the nearest matching ancestor is always a
        // valid choice for descendant-only chains.
        let mut remaining = ancestors.iter().rev().peekable();
        let mut cursor = tree.parent(node);
        while let Some(compound) = remaining.peek() {
            let Some(current) = cursor else {
                return false;
            };
            if compound.matches(tree, current) {
                remaining.next();
            }
            cursor = tree.parent(current);
        }
        true
    }
}

impl CompoundSelector {
    fn matches<T: ElementTree>(&self, tree: &T, node: T::Node) -> bool {
        if let Some(tag) = &self.tag {
            match tree.tag_name(node) {
                Some(actual) if actual.eq_ignore_ascii_case(tag) => {}
                _ => return false,
            }
        }
        if let Some(id) = &self.id {
            if tree.attribute(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| tree.has_class(node, class)) {
            return false;
        }
        self.attributes.iter().all(|attr| {
            let value = tree.attribute(node, &attr.name);
            match (&attr.op, value) {
                (_, None) => false,
                (AttributeOp::Equals(expected), Some(actual)) => actual == expected,
                (AttributeOp::Prefix(prefix), Some(actual)) => actual.starts_with(prefix.as_str()),
            }
        })
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, complex) in self.alternatives.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            for (position, compound) in complex.compounds.iter().enumerate() {
                if position > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{compound}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            f.write_str(tag)?;
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for attr in &self.attributes {
            let (op, value) = match &attr.op {
                AttributeOp::Equals(value) => ("=", value),
                AttributeOp::Prefix(value) => ("^=", value),
            };
            write!(f, "[{}{op}\"", attr.name)?;
            for c in value.chars() {
                if matches!(c, '"' | '\\') {
                    f.write_str("\\")?;
                }
                write!(f, "{c}")?;
            }
            f.write_str("\"]")?;
        }
        Ok(())
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = SelectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Selector> for String {
    fn from(value: Selector) -> Self {
        value.to_string()
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Selector, SelectorError> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_whitespace();
            let complex = self.parse_complex()?;
            alternatives.push(complex);
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some(',') => self.pos += 1,
                Some(found) => return Err(self.unexpected(found)),
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = Vec::new();
        loop {
            let compound = self.parse_compound()?;
            compounds.push(compound);

            let had_space = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some(_) if had_space => continue,
                Some(found) => return Err(self.unexpected(found)),
            }
        }
        Ok(ComplexSelector { compounds })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut compound = CompoundSelector::default();

        if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }

        while let Some(next) = self.peek() {
            match next {
                '#' => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                '.' => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                '[' => {
                    self.pos += 1;
                    compound.attributes.push(self.attribute()?);
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return Err(match self.peek() {
                Some(found) => self.unexpected(found),
                None => SelectorError::Empty,
            });
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();

        let op = match self.peek() {
            Some('=') => {
                self.pos += 1;
                "="
            }
            Some('^') if self.peek_at(1) == Some('=') => {
                self.pos += 2;
                "^="
            }
            Some(other) if "~|$*".contains(other) => {
                return Err(SelectorError::UnsupportedOperator {
                    input: self.input.to_string(),
                    op: format!("{other}="),
                });
            }
            Some(found) => return Err(self.unexpected(found)),
            None => return Err(SelectorError::UnterminatedAttribute(self.input.to_string())),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.quoted(quote)?
            }
            Some(found) => return Err(self.unexpected(found)),
            None => return Err(SelectorError::UnterminatedAttribute(self.input.to_string())),
        };

        self.skip_whitespace();
        if self.peek() != Some(']') {
            return Err(SelectorError::UnterminatedAttribute(self.input.to_string()));
        }
        self.pos += 1;

        let op = match op {
            "=" => AttributeOp::Equals(value),
            _ => AttributeOp::Prefix(value),
        };
        Ok(AttributeSelector { name, op })
    }

    /// Reads up to the closing `quote`; a backslash takes the next character literally.
    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(value);
                }
                Some('\\') => {
                    let Some(escaped) = self.peek_at(1) else {
                        break;
                    };
                    value.push(escaped);
                    self.pos += 2;
                }
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
                None => break,
            }
        }
        Err(SelectorError::UnterminatedAttribute(self.input.to_string()))
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        match (self.peek(), self.peek_at(1)) {
            (Some(digit), _) if digit.is_ascii_digit() => return Err(self.unexpected(digit)),
            (Some('-'), Some(digit)) if digit.is_ascii_digit() => {
                self.pos += 1;
                return Err(self.unexpected(digit));
            }
            _ => {}
        }
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(match self.peek() {
                Some(found) => self.unexpected(found),
                None => SelectorError::Empty,
            });
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::UnexpectedChar {
            input: self.input.to_string(),
            found,
            offset: self.pos,
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}
