//! Area expansion error types.

use std::fmt;

use crate::domain::InvalidRadius;

/// Errors from the postal-area expansion client.
#[derive(Debug)]
pub enum AreaError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    Api { status: u16, message: String },

    /// The requested radius is not one of the supported values
    InvalidRadius(InvalidRadius),
}

impl fmt::Display for AreaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaError::Http(e) => write!(f, "HTTP error: {e}"),
            AreaError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            AreaError::Api { status, message } => {
                write!(f, "postal-area API error {status}: {message}")
            }
            AreaError::InvalidRadius(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AreaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AreaError::Http(e) => Some(e),
            AreaError::InvalidRadius(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AreaError {
    fn from(err: reqwest::Error) -> Self {
        AreaError::Http(err)
    }
}

impl From<InvalidRadius> for AreaError {
    fn from(err: InvalidRadius) -> Self {
        AreaError::InvalidRadius(err)
    }
}
