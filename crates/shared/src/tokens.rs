//! Visual design tokens consumed by the styling layer.
//!
//! The controller never reads these; they are exported for the stylesheet
//! build and kept here so the markup contract and the palette live together.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub name: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontToken {
    pub name: &'static str,
    pub stack: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DesignTokens {
    pub colors: &'static [Token],
    pub fonts: &'static [FontToken],
    pub shadows: &'static [Token],
    pub spacing: &'static [Token],
}

#[rustfmt::skip]
pub const COLORS: &[Token] = &[
    Token { name: "primary", value: "#6366f1" },
    Token { name: "accent", value: "#a855f7" },
    Token { name: "secondary", value: "#14b8a6" },
    Token { name: "text-main", value: "#111827" },
    Token { name: "text-muted", value: "#6b7280" },
    Token { name: "bg-dark", value: "#ffffff" },
    Token { name: "bg-card", value: "#f8f9fa" },
    Token { name: "border", value: "rgba(0, 0, 0, 0.08)" },
];

#[rustfmt::skip]
pub const FONTS: &[FontToken] = &[
    FontToken { name: "display", stack: &["Baumans", "cursive"] },
    FontToken { name: "heading", stack: &["Antonio", "sans-serif"] },
    FontToken { name: "body", stack: &["Inter", "sans-serif"] },
    FontToken { name: "sub", stack: &["Inter", "sans-serif"] },
];

#[rustfmt::skip]
pub const SHADOWS: &[Token] = &[
    Token { name: "sm", value: "0 2px 8px rgba(0, 0, 0, 0.08)" },
    Token { name: "md", value: "0 4px 16px rgba(0, 0, 0, 0.12)" },
    Token { name: "lg", value: "0 8px 32px rgba(0, 0, 0, 0.16)" },
];

#[rustfmt::skip]
pub const SPACING: &[Token] = &[
    Token { name: "xs", value: "0.5rem" },
    Token { name: "sm", value: "1rem" },
    Token { name: "md", value: "2rem" },
    Token { name: "lg", value: "4rem" },
    Token { name: "xl", value: "8rem" },
];

pub const DESIGN_TOKENS: DesignTokens = DesignTokens {
    colors: COLORS,
    fonts: FONTS,
    shadows: SHADOWS,
    spacing: SPACING,
};

impl DesignTokens {
    /// Renders the tokens as a `:root` block of CSS custom properties.
    pub fn to_css_variables(&self) -> String {
        let mut css = String::from(":root {\n");
        for token in self.colors {
            css.push_str(&format!("  --color-{}: {};\n", token.name, token.value));
        }
        for font in self.fonts {
            let stack = font
                .stack
                .iter()
                .map(|family| quote_family(family))
                .collect::<Vec<_>>()
                .join(", ");
            css.push_str(&format!("  --font-{}: {};\n", font.name, stack));
        }
        for token in self.shadows {
            css.push_str(&format!("  --shadow-{}: {};\n", token.name, token.value));
        }
        for token in self.spacing {
            css.push_str(&format!("  --spacing-{}: {};\n", token.name, token.value));
        }
        css.push('}');
        css
    }
}

fn quote_family(family: &str) -> String {
    match family {
        "serif" | "sans-serif" | "monospace" | "cursive" | "fantasy" => family.to_string(),
        _ => format!("'{family}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_groups_have_expected_sizes() {
        assert_eq!(DESIGN_TOKENS.shadows.len(), 3);
        assert_eq!(DESIGN_TOKENS.spacing.len(), 5);
        assert_eq!(DESIGN_TOKENS.fonts.len(), 4);
    }

    #[test]
    fn css_variables_quote_named_families_only() {
        let css = DESIGN_TOKENS.to_css_variables();
        assert!(css.starts_with(":root {"));
        assert!(css.contains("  --color-primary: #6366f1;"));
        assert!(css.contains("  --font-display: 'Baumans', cursive;"));
        assert!(css.contains("  --spacing-xl: 8rem;"));
        assert!(css.ends_with('}'));
    }
}
