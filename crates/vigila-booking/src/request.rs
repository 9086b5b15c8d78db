// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON request bodies accepted by the booking endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigila_core::{BookingStatus, PaymentStatus};

use crate::error::BookingError;

/// A partial booking sent to `PUT /api/v1/bookings/{id}`.
///
/// Every field is optional; `null` and absent are treated alike. Keys the
/// booking does not have, and identity fields such as `consumer_id`, are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    /// Must equal the booking id in the path.
    pub id: Option<String>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_id: Option<String>,
    pub service_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub duration_hours: Option<f64>,
    pub notes: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

/// Reject an update whose target is missing or whose body names a
/// different booking than the path.
pub fn check_update_target(
    booking_id: &str,
    request: &UpdateBookingRequest,
) -> Result<(), BookingError> {
    if booking_id.trim().is_empty() {
        return Err(BookingError::bad_request("booking id is required"));
    }
    match request.id.as_deref() {
        None => Err(BookingError::bad_request("request body must include the booking id")),
        Some(id) if id != booking_id => Err(BookingError::bad_request(
            "booking id in body does not match the path",
        )),
        Some(_) => Ok(()),
    }
}

/// Body of `POST /api/v1/bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub service_id: String,
    pub service_date: DateTime<Utc>,
    /// Defaults to `service_date + duration_hours`.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub duration_hours: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_fields_are_none() {
        let req: UpdateBookingRequest =
            serde_json::from_str(r#"{"id":"b1","notes":null,"consumer_id":"evil"}"#).unwrap();
        assert_eq!(req.id.as_deref(), Some("b1"));
        assert!(req.notes.is_none());
        assert!(req.status.is_none());
    }

    #[test]
    fn unknown_status_value_is_rejected() {
        let parsed = serde_json::from_str::<UpdateBookingRequest>(r#"{"id":"b1","status":"DONE"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn target_checks() {
        let req = UpdateBookingRequest {
            id: Some("b1".into()),
            ..Default::default()
        };
        assert!(check_update_target("b1", &req).is_ok());
        assert!(check_update_target("b2", &req).is_err());
        assert!(check_update_target("  ", &req).is_err());
        assert!(check_update_target("b1", &UpdateBookingRequest::default()).is_err());
    }
}
