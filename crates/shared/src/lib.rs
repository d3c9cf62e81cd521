pub mod domain;
pub mod error;
pub mod protocol;
pub mod selector;
pub mod surface;
pub mod tokens;
