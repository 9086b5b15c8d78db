// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking rules for the Vigila marketplace.
//!
//! [`BookingService`] handles reads, role-gated partial updates with
//! payment verification and status notifications, consumer deletes,
//! creation and listing. The field policy lives in [`policy`] and is pure,
//! so it can be tested without any collaborators.

pub mod access;
pub mod contact;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod request;
pub mod service;

pub use access::verify_booking_access;
pub use error::{AccessError, BookingError};
pub use request::{CreateBookingRequest, UpdateBookingRequest, check_update_target};
pub use service::{BookingService, DEFAULT_CONFIRMED_EDIT_WINDOW_HOURS};
