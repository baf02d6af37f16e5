//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The HTTP layer maps each kind to a status code (see `api::error`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Referenced book, member or loan does not resolve
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    /// Checkout attempted against a book with no loanable copy
    #[error("book '{0}' has no copies available")]
    OutOfStock(String),
    /// Return attempted against a loan in terminal state
    #[error("loan '{0}' is already returned")]
    AlreadyReturned(String),
    /// Member registration collides with an existing id (case-insensitive)
    #[error("member id '{0}' is already registered")]
    DuplicateMemberId(String),
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
    /// Required field empty or out of range
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Entity store read/write failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

// Stored records that no longer decode are a storage problem, not bad input
impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
