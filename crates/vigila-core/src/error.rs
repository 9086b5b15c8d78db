// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by the Vigila collaborator traits.

use thiserror::Error;

/// The error type returned by stores, verifiers, notifiers and auth adapters.
///
/// Request-level outcomes (forbidden, not found, bad request) are not modelled
/// here; see `vigila_booking::BookingError`.
#[derive(Debug, Error)]
pub enum VigilaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, row decoding).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Payment verification failed or the payment provider could not be reached.
    #[error("payment error: {message}")]
    Payment {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound notification could not be built or delivered.
    #[error("notification error: {message}")]
    Notification {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Token could not be resolved to an identity for a reason other than absence.
    #[error("auth error: {0}")]
    Auth(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VigilaError {
    /// Shorthand for a payment rejection without an underlying cause.
    pub fn payment(message: impl Into<String>) -> Self {
        Self::Payment {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a notification failure without an underlying cause.
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
            source: None,
        }
    }
}
