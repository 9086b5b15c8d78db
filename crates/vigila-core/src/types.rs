// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the store, the booking service and the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a booking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Refunded,
}

/// Payment state of a booking as tracked on our side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Marketplace role of an authenticated user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Family-side user requesting care.
    Consumer,
    /// Care provider.
    Vigil,
    /// Back-office staff. Owns no bookings.
    Admin,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind a [`crate::PluginAdapter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Auth,
    Payment,
    Notification,
}

/// A booking row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub consumer_id: String,
    pub vigil_id: String,
    pub service_id: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    /// Start of the engagement.
    pub service_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub duration_hours: f64,
    pub notes: Option<String>,
    pub price: f64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic concurrency token, bumped by every successful update.
    pub version: i64,
}

/// A marketplace user as seen by the booking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub role: Role,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A service offered by a vigil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub vigil_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub hourly_rate: f64,
    pub currency: String,
}

/// A booking joined with its consumer, vigil and service.
///
/// Serializes with the booking fields at the top level, matching the shape
/// the web client already consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub consumer: Option<UserProfile>,
    pub vigil: Option<UserProfile>,
    pub service: Option<Service>,
}

/// Write request for a compare-and-swap booking update.
#[derive(Debug, Clone)]
pub struct BookingUpdate {
    /// The fully merged record to persist. `version` is ignored; the store bumps it.
    pub booking: Booking,
    /// The version the merge was computed from.
    pub expected_version: i64,
}

/// Result of a compare-and-swap booking update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The row matched and was written.
    Applied(BookingDetails),
    /// The row exists but its version moved on since it was read.
    VersionConflict,
    /// No row with that id exists any more.
    Missing,
}

/// Selects the bookings visible to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOwner {
    Consumer(String),
    Vigil(String),
}

/// Recipient of a booking notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
}
