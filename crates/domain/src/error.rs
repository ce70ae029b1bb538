//! Unified error types for the domain layer
//!
//! Provides a common error type for catalog and form operations, so the
//! engine never has to match on strings coming out of the domain.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Catalog lookup failed
    #[error("Unknown {kind}: {name}")]
    Unknown { kind: &'static str, name: String },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Card slot index outside the deck
    #[error("Card slot {0} is out of range (deck has 5 slots)")]
    SlotOutOfRange(usize),
}

impl DomainError {
    /// Creates a validation error for rejected field values.
    ///
    /// # Example
    /// ```ignore
    /// if name.trim().len() < 2 {
    ///     return Err(DomainError::validation("Community name is too short"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Create an unknown catalog entry error
    pub fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        Self::Unknown {
            kind,
            name: name.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }
}
