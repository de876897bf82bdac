//! Validation error types

use std::fmt;

/// Validation error for request bodies and key parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Body is not a JSON object
    NotAnObject,

    /// Required field is absent or null
    Missing { field: &'static str },

    /// Value has the wrong JSON type for the column
    InvalidType { field: &'static str, expected: &'static str },

    /// String doesn't parse as the column's type (e.g., a timestamp)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Request body could not be read as JSON
    InvalidBody(String),

    /// Query string could not be decoded
    InvalidQuery(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "request body must be a JSON object"),
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::InvalidType { field, expected } => {
                write!(f, "{} must be {}", field, expected)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
            Self::InvalidBody(reason) => write!(f, "invalid JSON body: {}", reason),
            Self::InvalidQuery(reason) => write!(f, "invalid query string: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::InvalidType {
            field: "預設匯率",
            expected: "a number",
        };
        assert_eq!(err.to_string(), "預設匯率 must be a number");

        let err = ValidationError::Missing { field: "ID" };
        assert_eq!(err.to_string(), "ID is required");
    }
}
