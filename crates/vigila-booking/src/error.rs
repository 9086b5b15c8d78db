// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-level error types for booking operations.

use thiserror::Error;
use vigila_core::VigilaError;

/// Why a caller may not see a booking.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("booking not found")]
    NotFound,

    #[error("booking belongs to another user")]
    Forbidden,

    /// The store could not be read.
    #[error("booking lookup failed: {0}")]
    Store(#[source] VigilaError),
}

/// Outcome of a failed booking request. Each variant maps to one HTTP
/// status and one envelope code.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    BadRequest(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("access denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    /// The payment verifier rejected the payment; carries its message.
    #[error("{0}")]
    PaymentVerification(String),

    /// The booking changed between read and write.
    #[error("booking was modified by another request")]
    Conflict,

    #[error("failed to persist booking")]
    Persistence(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl BookingError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Stable machine-readable code, used in the response envelope and
    /// as the `outcome` metric label.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::PaymentVerification(_) => "PAYMENT_VERIFICATION_FAILED",
            Self::Conflict => "CONFLICT",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<AccessError> for BookingError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound => Self::NotFound("booking"),
            AccessError::Forbidden => Self::Forbidden,
            AccessError::Store(e) => Self::Persistence(e.to_string()),
        }
    }
}
