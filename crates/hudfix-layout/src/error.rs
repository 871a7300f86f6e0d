//! Error types for hudfix-layout

/// Result type for layout transforms
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while rewriting a layout payload
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("Layout payload is not valid UTF-8: {reason}")]
    Encoding { reason: String },

    #[error("Line {line}: {key} has non-numeric value {value:?}")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
}
