use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, rendering or delivering an attendance sheet.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid resource '{}': {reason}", path.display())]
    InvalidResource { path: PathBuf, reason: String },

    #[error("Failed to serialize document: {0}")]
    SerializationFailure(String),

    #[error("Email delivery is not configured")]
    EmailNotConfigured,

    #[error("Email delivery failed: {0}")]
    Email(#[from] resend_rs::Error),
}

impl SheetError {
    pub(crate) fn invalid_resource(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SheetError::InvalidResource {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn serialization(err: impl ToString) -> Self {
        SheetError::SerializationFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
