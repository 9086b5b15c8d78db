// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; without an installed recorder these calls
//! are no-ops.

use metrics::describe_counter;

pub const BOOKING_REQUESTS_TOTAL: &str = "vigila_booking_requests_total";
pub const NOTIFICATIONS_TOTAL: &str = "vigila_notifications_total";

/// Register metric descriptions. Called once after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        BOOKING_REQUESTS_TOTAL,
        "Booking requests handled, by operation and outcome"
    );
    describe_counter!(
        NOTIFICATIONS_TOTAL,
        "Booking status notifications attempted, by outcome"
    );
}

/// Record one booking request. `outcome` is `ok` or an error code.
pub fn record_request(operation: &'static str, outcome: &'static str) {
    metrics::counter!(BOOKING_REQUESTS_TOTAL, "operation" => operation, "outcome" => outcome)
        .increment(1);
}

pub fn record_notification(delivered: bool) {
    let outcome = if delivered { "sent" } else { "failed" };
    metrics::counter!(NOTIFICATIONS_TOTAL, "outcome" => outcome).increment(1);
}
