// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking store trait.

use async_trait::async_trait;

use crate::error::VigilaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Booking, BookingDetails, BookingOwner, BookingUpdate, Service, UpdateOutcome, UserProfile,
};

/// Durable storage for bookings and the records they reference.
///
/// Reads return the joined [`BookingDetails`] shape.
#[async_trait]
pub trait BookingStore: PluginAdapter {
    /// Fetch a booking with its consumer, vigil and service.
    async fn get_booking(&self, id: &str) -> Result<Option<BookingDetails>, VigilaError>;

    /// Write `update.booking` if the stored version still equals
    /// `update.expected_version`, bumping the version on success.
    async fn update_booking(&self, update: &BookingUpdate) -> Result<UpdateOutcome, VigilaError>;

    /// Delete a booking. Returns `false` when no row matched.
    async fn delete_booking(&self, id: &str) -> Result<bool, VigilaError>;

    /// Insert a new booking and return it joined.
    async fn create_booking(&self, booking: &Booking) -> Result<BookingDetails, VigilaError>;

    /// List bookings owned by a consumer or assigned to a vigil.
    async fn list_bookings(&self, owner: &BookingOwner) -> Result<Vec<BookingDetails>, VigilaError>;

    async fn get_service(&self, id: &str) -> Result<Option<Service>, VigilaError>;

    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>, VigilaError>;
}
