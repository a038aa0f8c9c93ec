//! Error types for YAML parsing.

use estate_core::ColorParseError;
use thiserror::Error;

/// Error type for manifest and script parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Error message
        message: String,
    },
    /// Unparseable hex color
    #[error("Invalid color '{value}': {source}")]
    Color {
        /// The offending string
        value: String,
        /// Why it failed
        #[source]
        source: ColorParseError,
    },
}

impl ParseError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ParseError::Validation("bad".into()).to_string(),
            "Validation error: bad"
        );
        assert_eq!(
            ParseError::invalid("step", "must be positive").to_string(),
            "Invalid value for 'step': must be positive"
        );
    }

    #[test]
    fn test_color_error_has_source() {
        use std::error::Error as _;
        let err = ParseError::Color {
            value: "#zz".into(),
            source: ColorParseError::InvalidLength,
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Invalid color '#zz'"));
    }
}
