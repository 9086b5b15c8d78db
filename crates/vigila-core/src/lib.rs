// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Vigila booking service.
//!
//! Holds the domain types, the collaborator error type, and the traits the
//! booking service is written against. Storage, payment and email crates
//! implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::VigilaError;
pub use types::{
    AdapterType, Booking, BookingDetails, BookingOwner, BookingStatus, BookingUpdate,
    ContactInfo, HealthStatus, PaymentStatus, Role, Service, UpdateOutcome, UserProfile,
};

pub use traits::{AuthAdapter, BookingNotifier, BookingStore, PaymentVerifier, PluginAdapter};
