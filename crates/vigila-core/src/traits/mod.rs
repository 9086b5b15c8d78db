// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the booking service.
//!
//! All collaborators extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so they can be held as `Arc<dyn Trait>`.

pub mod adapter;
pub mod auth;
pub mod notify;
pub mod payment;
pub mod storage;

pub use adapter::PluginAdapter;
pub use auth::AuthAdapter;
pub use notify::BookingNotifier;
pub use payment::PaymentVerifier;
pub use storage::BookingStore;
