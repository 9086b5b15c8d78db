// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Vigila integration tests.
//!
//! - [`MockBookingStore`]: in-memory store with the version precondition
//! - [`MockPaymentVerifier`]: accepting or rejecting verifier that records calls
//! - [`MockNotifier`]: captures notifications, optionally failing
//! - [`MockAuth`]: fixed token-to-user map
//! - [`TestHarness`]: SQLite storage plus the gateway router for HTTP tests

pub mod fixtures;
pub mod harness;
pub mod mock_auth;
pub mod mock_notifier;
pub mod mock_payment;
pub mod mock_store;

pub use harness::{TestHarness, TestResponse};
pub use mock_auth::MockAuth;
pub use mock_notifier::{MockNotifier, SentNotification};
pub use mock_payment::{MockPaymentVerifier, VerifyCall};
pub use mock_store::MockBookingStore;
