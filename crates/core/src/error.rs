//! Domain error model.

use thiserror::Error;

use crate::id::Sku;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// duplicates, malformed payloads). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank required field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. blank SKU).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Insert attempted with an identifier that already exists.
    #[error("duplicate SKU: {0}")]
    DuplicateSku(Sku),

    /// Category is not part of the active profile's category table.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// An import payload had an unrecognized shape or no usable records.
    #[error("malformed import: {0}")]
    MalformedImport(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn duplicate(sku: Sku) -> Self {
        Self::DuplicateSku(sku)
    }

    pub fn unknown_category(category: impl Into<String>) -> Self {
        Self::UnknownCategory(category.into())
    }

    pub fn malformed_import(msg: impl Into<String>) -> Self {
        Self::MalformedImport(msg.into())
    }
}
