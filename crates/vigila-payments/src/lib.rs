// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment verification for the Vigila booking service.
//!
//! [`StripePaymentVerifier`] checks that a payment intent succeeded and was
//! made by the paying consumer for the booking being confirmed.

pub mod client;
pub mod types;
pub mod verifier;

pub use client::PaymentsClient;
pub use verifier::{DisabledPaymentVerifier, StripePaymentVerifier};
