//! Error types for doacme
//!
//! This module defines all error types used throughout the crate.
//!
//! A reconciliation that decides no write is needed is *not* an error; it is
//! reported through [`crate::reconciler::Outcome`].

use crate::reconciler::Action;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for doacme operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for doacme
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing field, conflicting intents, bad value)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record expected but not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Operation disabled by configuration for the current remote state
    #[error("Operation not permitted: {0}")]
    Permission(String),

    /// A create, update or delete call failed
    #[error("Record {action} failed: {source}")]
    Mutation {
        /// The mutation that was attempted
        action: Action,
        /// The underlying store error
        #[source]
        source: Box<Error>,
    },

    /// A mutation did not complete before its deadline
    #[error("Record {action} timed out after {after:?}")]
    Timeout {
        /// The mutation that was attempted
        action: Action,
        /// The deadline that expired
        after: Duration,
    },

    /// HTTP client errors (from the provider API)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a permission error
    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }

    /// Wrap a store error as a failed mutation
    pub fn mutation(action: Action, source: Error) -> Self {
        Self::Mutation {
            action,
            source: Box::new(source),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised before any remote call was made
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
