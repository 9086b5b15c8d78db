// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role-gated field policy for booking updates.
//!
//! The set of fields a caller may change is a function of their role, the
//! booking's current status, and how long ago the booking ended. Fields
//! outside that set are dropped from the request before it is merged.
//!
//! No status transition graph is enforced here: a caller allowed to write
//! `status` may set any value.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use strum::Display;
use vigila_core::{Booking, BookingStatus, PaymentStatus, Role};

use crate::request::UpdateBookingRequest;

/// A booking field some caller may be granted. Price, currency and the end
/// date are never writable through an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BookingField {
    ServiceDate,
    DurationHours,
    Notes,
    Status,
    PaymentId,
    PaymentStatus,
}

const CONSUMER_SCHEDULE_FIELDS: [BookingField; 4] = [
    BookingField::ServiceDate,
    BookingField::DurationHours,
    BookingField::Notes,
    BookingField::Status,
];

const CONSUMER_PAYMENT_FIELDS: [BookingField; 3] = [
    BookingField::PaymentId,
    BookingField::PaymentStatus,
    BookingField::Status,
];

const VIGIL_FIELDS: [BookingField; 2] = [BookingField::Status, BookingField::Notes];

/// What a request is trying to do, derived before any policy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateIntent {
    /// The body marks the payment as `PAID`.
    pub is_payment_status_update: bool,
    /// The body carries a status different from the current one.
    pub is_status_update: bool,
    /// A payment reference must be checked with the verifier first.
    pub requires_payment_verification: bool,
    pub has_payment_id: bool,
}

impl UpdateIntent {
    pub fn classify(request: &UpdateBookingRequest, current: &Booking) -> Self {
        let is_payment_status_update = request.payment_status == Some(PaymentStatus::Paid);
        let is_status_update = request.status.is_some_and(|s| s != current.status);
        let requires_payment_verification = is_payment_status_update
            || (is_status_update && request.status == Some(BookingStatus::Confirmed));
        Self {
            is_payment_status_update,
            is_status_update,
            requires_payment_verification,
            has_payment_id: request.payment_id.is_some(),
        }
    }

    /// Whether the verifier has to be called for this request.
    pub fn should_verify_payment(&self) -> bool {
        self.requires_payment_verification && self.has_payment_id
    }

    fn carries_verified_payment(&self) -> bool {
        self.is_payment_status_update && self.has_payment_id
    }
}

/// Inputs to [`allowed_fields`].
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    pub role: Role,
    pub current: &'a Booking,
    pub intent: UpdateIntent,
    pub now: DateTime<Utc>,
    pub confirmed_edit_window: Duration,
}

/// The fields a caller may write, plus the status applied when a payment
/// update arrives without one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldGrant {
    pub fields: BTreeSet<BookingField>,
    pub default_status: Option<BookingStatus>,
}

impl FieldGrant {
    pub fn allows(&self, field: BookingField) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// True once more than `window` has passed since `end_date`. Bookings
/// without an end date never qualify.
pub fn confirmed_window_elapsed(
    end_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    end_date.is_some_and(|end| now - end > window)
}

/// Compute the writable field set for one request.
pub fn allowed_fields(ctx: &EditContext<'_>) -> FieldGrant {
    let mut grant = FieldGrant::default();
    match ctx.role {
        Role::Consumer => {
            let schedule_editable = match ctx.current.status {
                BookingStatus::Pending => true,
                BookingStatus::Confirmed => confirmed_window_elapsed(
                    ctx.current.end_date,
                    ctx.now,
                    ctx.confirmed_edit_window,
                ),
                _ => false,
            };
            if schedule_editable {
                grant.fields.extend(CONSUMER_SCHEDULE_FIELDS);
            }
            if ctx.intent.carries_verified_payment() {
                grant.fields.extend(CONSUMER_PAYMENT_FIELDS);
                grant.default_status = Some(BookingStatus::Confirmed);
            }
        }
        Role::Vigil => grant.fields.extend(VIGIL_FIELDS),
        Role::Admin => {}
    }
    grant
}

/// Overwrite the granted fields of `current` with the values present in
/// `request`. Absent fields are left untouched.
pub fn merge(current: &Booking, request: &UpdateBookingRequest, grant: &FieldGrant) -> Booking {
    let mut merged = current.clone();

    if grant.allows(BookingField::Status)
        && let Some(status) = request.status.or(grant.default_status)
    {
        merged.status = status;
    }
    if grant.allows(BookingField::PaymentStatus)
        && let Some(payment_status) = request.payment_status
    {
        merged.payment_status = payment_status;
    }
    if grant.allows(BookingField::PaymentId)
        && let Some(payment_id) = &request.payment_id
    {
        merged.payment_id = Some(payment_id.clone());
    }
    if grant.allows(BookingField::ServiceDate)
        && let Some(service_date) = request.service_date
    {
        merged.service_date = service_date;
    }
    if grant.allows(BookingField::DurationHours)
        && let Some(hours) = request.duration_hours
    {
        merged.duration_hours = hours;
    }
    if grant.allows(BookingField::Notes)
        && let Some(notes) = &request.notes
    {
        merged.notes = Some(notes.clone());
    }

    merged
}
