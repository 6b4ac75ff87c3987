use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to in-process callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RsvpError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Response not found: {id}")]
    NotFound { id: Uuid },

    #[error("Credenziali errate")]
    Unauthorized,

    #[error("Response store unavailable")]
    Unavailable,

    #[error("Internal error")]
    Internal,
}

impl RsvpError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }
}
