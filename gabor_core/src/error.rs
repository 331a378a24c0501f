//! Error types for stimulus synthesis and bitmap export.
//!
//! Session input handling never fails; ignored clicks are reported through
//! [`crate::session::Feedback::Ignored`]. Only synthesis preconditions and
//! rendering side effects produce errors.

use std::fmt;

/// Result type alias for synthesis and rendering operations
pub type GaborResult<T> = Result<T, GaborError>;

#[derive(Debug, Clone, PartialEq)]
pub enum GaborError {
    /// Invalid parameter value
    InvalidParameter {
        parameter: String,
        value: String,
        constraint: String,
    },

    /// Bitmap could not be written by the export backend
    Render { details: String },
}

impl fmt::Display for GaborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaborError::InvalidParameter {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = '{}': must satisfy {}",
                    parameter, value, constraint
                )
            }
            GaborError::Render { details } => {
                write!(f, "Failed to render patch bitmap: {}", details)
            }
        }
    }
}

impl std::error::Error for GaborError {}

impl GaborError {
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl fmt::Display,
        constraint: impl Into<String>,
    ) -> Self {
        GaborError::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    pub fn render(details: impl fmt::Display) -> Self {
        GaborError::Render {
            details: details.to_string(),
        }
    }
}

impl From<std::io::Error> for GaborError {
    fn from(err: std::io::Error) -> Self {
        GaborError::render(err)
    }
}
