// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for domain records used across tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use vigila_core::{Booking, BookingStatus, PaymentStatus, Role, Service, UserProfile};

/// A fixed instant so tests do not depend on the wall clock.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn user(id: &str, role: Role) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        role,
        email: format!("{id}@example.org"),
        display_name: None,
        full_name: None,
        first_name: None,
        last_name: None,
    }
}

pub fn service(id: &str, vigil_id: &str, hourly_rate: f64) -> Service {
    Service {
        id: id.to_string(),
        vigil_id: vigil_id.to_string(),
        name: "Companionship visit".to_string(),
        description: None,
        hourly_rate,
        currency: "EUR".to_string(),
    }
}

/// A three-hour booking starting at [`base_time`].
pub fn booking(
    id: &str,
    consumer_id: &str,
    vigil_id: &str,
    service_id: &str,
    status: BookingStatus,
) -> Booking {
    let start = base_time();
    Booking {
        id: id.to_string(),
        consumer_id: consumer_id.to_string(),
        vigil_id: vigil_id.to_string(),
        service_id: service_id.to_string(),
        status,
        payment_status: PaymentStatus::Pending,
        payment_id: None,
        service_date: start,
        end_date: Some(start + Duration::hours(3)),
        duration_hours: 3.0,
        notes: None,
        price: 60.0,
        currency: "EUR".to_string(),
        created_at: start - Duration::days(7),
        updated_at: start - Duration::days(7),
        version: 1,
    }
}
