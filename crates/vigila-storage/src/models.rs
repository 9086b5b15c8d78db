// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage entity types, re-exported from `vigila-core` where the adapter
//! traits define them.

pub use vigila_core::types::{Booking, BookingDetails, Service, UserProfile};
