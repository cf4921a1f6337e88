//! Error handling module
//!
//! Crate-wide error type. Domain errors pass through transparently so
//! callers can pattern-match the exact failure; storage and
//! configuration errors are wrapped and never recovered locally.

use crate::config::ConfigError;
use crate::domain::DomainError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// The domain error inside, if this is one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(err) => Some(err),
            _ => None,
        }
    }

    /// Invariant violations must abort the unit of work and page a
    /// human; they are never retried blindly.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, AppError::Domain(err) if err.is_invariant_violation())
    }
}
