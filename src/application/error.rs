//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures during use case execution: missing
//! aggregates, malformed requests, authorization failures, and
//! infrastructure errors. The API layer maps them to HTTP statuses in one
//! place.

use crate::domain::errors::DomainError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request is malformed or names an invalid field/status.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Actor identity is missing or insufficient.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Domain error.
    #[error("domain error: {0}")]
    DomainError(#[from] DomainError),

    /// Trade store error.
    #[error("repository error: {0}")]
    RepositoryError(String),

    /// Delivery queue error.
    #[error("queue error: {0}")]
    QueueError(String),

    /// Asset resolution failed while hydrating a trade.
    #[error("hydration error: {0}")]
    HydrationError(String),

    /// Event publishing error.
    #[error("event publishing error: {0}")]
    EventPublishError(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a repository error.
    #[must_use]
    pub fn repository(message: impl Into<String>) -> Self {
        Self::RepositoryError(message.into())
    }

    /// Creates a queue error.
    #[must_use]
    pub fn queue(message: impl Into<String>) -> Self {
        Self::QueueError(message.into())
    }

    /// Creates a hydration error.
    #[must_use]
    pub fn hydration(message: impl Into<String>) -> Self {
        Self::HydrationError(message.into())
    }

    /// Creates an event publish error.
    #[must_use]
    pub fn event_publish(message: impl Into<String>) -> Self {
        Self::EventPublishError(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
