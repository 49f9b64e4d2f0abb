//! # AppError
//!
//! Centralized error handling for review management.
//! Every rejection keeps its kind so the HTTP boundary can map it to a distinct status.

use thiserror::Error;

/// The primary error type for all review-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Referenced entity does not exist (e.g., User, POS, Review)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Missing or malformed input (e.g., no author reference, blank text)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The author already has a different review for the same POS,
    /// or a concurrent writer changed the row first.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Business rule forbids the action (e.g., approving one's own review)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Infrastructure failure (e.g., DB down, misconfiguration)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        AppError::NotFound(entity.to_string(), id.to_string())
    }

    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(..) => "not_found",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Conflict(_) => "conflict",
            AppError::Forbidden(_) => "forbidden",
            AppError::Internal(_) => "internal",
        }
    }
}

/// A specialized Result type for review logic.
pub type Result<T> = std::result::Result<T, AppError>;
