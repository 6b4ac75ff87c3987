use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{field} cannot be empty")]
    EmptyName { field: &'static str },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Response not found: {id}")]
    NotFound { id: Uuid },

    #[error("Credenziali errate")]
    Unauthorized,

    #[error("Response store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Report rendering failed: {message}")]
    ReportFailed { message: String },
}

impl DomainError {
    pub fn empty_name(field: &'static str) -> Self {
        Self::EmptyName { field }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    /// Keeps the whole `anyhow` context chain in the message.
    pub fn store(err: anyhow::Error) -> Self {
        Self::StoreUnavailable {
            message: format!("{err:#}"),
        }
    }

    pub fn report(err: anyhow::Error) -> Self {
        Self::ReportFailed {
            message: format!("{err:#}"),
        }
    }
}
