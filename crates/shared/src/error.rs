use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contact form rejections, displayed verbatim in the status region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("submission rejected with status {status}")]
    Rejected { status: u16 },
    #[error("submission transport failure: {0}")]
    Transport(String),
    #[error("submission unavailable: {0}")]
    Unavailable(String),
}

impl SubmitError {
    /// Message shown to the visitor for any submission failure.
    pub const USER_MESSAGE: &'static str = "Oops! Something went wrong. Please try again.";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected character `{found}` at offset {offset} in `{input}`")]
    UnexpectedChar {
        input: String,
        found: char,
        offset: usize,
    },
    #[error("unterminated attribute selector in `{0}`")]
    UnterminatedAttribute(String),
    #[error("unsupported attribute operator `{op}` in `{input}`")]
    UnsupportedOperator { input: String, op: String },
}
