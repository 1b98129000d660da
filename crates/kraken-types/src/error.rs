//! Error types for wire enum parsing

use thiserror::Error;

/// A string did not name any variant of a wire enum
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {value:?}")]
pub struct ParseEnumError {
    /// Request parameter the value was meant for (e.g. `ordertype`)
    pub field: &'static str,
    /// The rejected value
    pub value: String,
}

impl ParseEnumError {
    /// Create a new parse error
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}
