//! Error types for the Haven suite.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the Haven suite.
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required fields were absent or empty after sanitization.
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields {
        /// Names of the missing fields, in declaration order.
        fields: Vec<String>,
    },

    /// A field was present but failed validation.
    #[error("{message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Too many requests from one client within the window.
    #[error("Too many submissions: retry after {retry_after:?}")]
    RateLimited {
        /// Duration to wait before retrying.
        retry_after: Duration,
    },

    /// An outbound email provider rejected or failed the send.
    #[error("Provider '{provider}' failed: {message}")]
    Provider {
        /// Provider name (web3forms, resend, emailjs, gmail).
        provider: String,
        /// Error message.
        message: String,
    },

    /// A provider has no credentials configured and cannot be attempted.
    #[error("Provider '{provider}' is not configured")]
    NotConfigured {
        /// Provider name.
        provider: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Returns `true` if retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::RateLimited { .. })
    }

    /// Creates a validation error with the given message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a provider error with the given provider name and message.
    #[must_use]
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display() {
        let err = Error::MissingFields {
            fields: vec!["firstName".to_string(), "email".to_string()],
        };
        assert_eq!(err.to_string(), "Missing required fields: firstName, email");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(Error::provider("resend", "503").is_retryable());
        assert!(!Error::validation("bad email").is_retryable());
        assert!(!Error::NotConfigured {
            provider: "gmail".to_string()
        }
        .is_retryable());
    }
}
