//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Deterministic, business-level failures only. Storage and transport failures
/// live in their own error types and are never folded into this one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed column reference).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
