//! Failure model shared by every domain type.

use thiserror::Error;

/// Result alias for fallible domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic business-rule failure.
///
/// Everything here is a rule the caller broke: bad input, a quantity the
/// shelf cannot cover, a stale version. Transport and storage failures live
/// in the crates that own those concerns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed a structural check (blank barcode, non-positive quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An update would have left a record in an illegal state.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier string did not parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The addressed record does not exist.
    #[error("not found")]
    NotFound,

    /// The requested quantity exceeds what the addressed side holds. The
    /// message names the quantity actually available.
    #[error("{0}")]
    InsufficientStock(String),

    /// A stock location outside the known set was supplied.
    #[error("{0}")]
    InvalidLocation(String),

    /// The record changed underneath the caller (stale version).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId(message.into())
    }

    pub fn insufficient_stock(message: impl Into<String>) -> Self {
        Self::InsufficientStock(message.into())
    }

    pub fn invalid_location(message: impl Into<String>) -> Self {
        Self::InvalidLocation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
