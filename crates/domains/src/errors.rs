//! # AppError
//!
//! Centralized error handling for the Rusty-Press ecosystem.
//! The `Display` output of every variant is the message shown to the
//! person who issued the request.

use thiserror::Error;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Resource not found (e.g., "Post", "Category")
    #[error("{0} not found")]
    NotFound(String),

    /// Input rejected before touching the store
    #[error("{0}")]
    Validation(String),

    /// No identity attached to the request
    #[error("Not authenticated")]
    Unauthenticated,

    /// Identity present but role or ownership insufficient
    #[error("{0}")]
    Forbidden(String),

    /// Resource already exists or is still referenced
    #[error("{0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., DB down, disk full)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(entity.to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Wraps an infrastructure error from an adapter.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A specialized Result type for Rusty-Press logic.
pub type Result<T> = std::result::Result<T, AppError>;
