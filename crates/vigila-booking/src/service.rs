// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The booking service: read, update, delete, create and list bookings on
//! behalf of an authenticated caller.
//!
//! Collaborators are injected as trait objects so the gateway, the binary
//! and the tests can each supply their own.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use vigila_core::{
    Booking, BookingDetails, BookingNotifier, BookingOwner, BookingStatus, BookingStore,
    BookingUpdate, PaymentStatus, PaymentVerifier, Role, UpdateOutcome, UserProfile, VigilaError,
};

use crate::access::verify_booking_access;
use crate::contact::contact_for;
use crate::error::BookingError;
use crate::metrics::{record_notification, record_request};
use crate::policy::{EditContext, UpdateIntent, allowed_fields, merge};
use crate::request::{CreateBookingRequest, UpdateBookingRequest, check_update_target};

/// Hours after `end_date` before a consumer may edit a confirmed booking.
pub const DEFAULT_CONFIRMED_EDIT_WINDOW_HOURS: i64 = 24;

pub struct BookingService {
    store: Arc<dyn BookingStore>,
    verifier: Arc<dyn PaymentVerifier>,
    notifier: Arc<dyn BookingNotifier>,
    confirmed_edit_window: Duration,
}

impl BookingService {
    pub fn new(
        store: Arc<dyn BookingStore>,
        verifier: Arc<dyn PaymentVerifier>,
        notifier: Arc<dyn BookingNotifier>,
    ) -> Self {
        Self {
            store,
            verifier,
            notifier,
            confirmed_edit_window: Duration::hours(DEFAULT_CONFIRMED_EDIT_WINDOW_HOURS),
        }
    }

    pub fn with_confirmed_edit_window_hours(mut self, hours: i64) -> Self {
        self.confirmed_edit_window = Duration::hours(hours);
        self
    }

    pub fn store(&self) -> &Arc<dyn BookingStore> {
        &self.store
    }

    /// Return the booking if `caller` owns it.
    pub async fn get(
        &self,
        booking_id: &str,
        caller: &UserProfile,
    ) -> Result<BookingDetails, BookingError> {
        let result = verify_booking_access(self.store.as_ref(), booking_id, &caller.id, caller.role)
            .await
            .map_err(BookingError::from);
        observe("get", &result);
        result
    }

    /// Apply a partial update as of the current time.
    pub async fn update(
        &self,
        booking_id: &str,
        caller: &UserProfile,
        request: UpdateBookingRequest,
    ) -> Result<BookingDetails, BookingError> {
        self.update_at(booking_id, caller, request, Utc::now()).await
    }

    /// Apply a partial update as of `now`.
    pub async fn update_at(
        &self,
        booking_id: &str,
        caller: &UserProfile,
        request: UpdateBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<BookingDetails, BookingError> {
        let result = self.apply_update(booking_id, caller, &request, now).await;
        observe("update", &result);
        result
    }

    async fn apply_update(
        &self,
        booking_id: &str,
        caller: &UserProfile,
        request: &UpdateBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<BookingDetails, BookingError> {
        check_update_target(booking_id, request)?;

        let current =
            verify_booking_access(self.store.as_ref(), booking_id, &caller.id, caller.role)
                .await?
                .booking;
        let intent = UpdateIntent::classify(request, &current);

        if intent.should_verify_payment()
            && let Some(payment_id) = request.payment_id.as_deref()
        {
            self.verifier
                .verify(payment_id, &caller.id, booking_id)
                .await
                .map_err(|e| {
                    warn!(booking_id, user_id = %caller.id, error = %e, "payment verification failed");
                    BookingError::PaymentVerification(verifier_message(e))
                })?;
        }

        let grant = allowed_fields(&EditContext {
            role: caller.role,
            current: &current,
            intent,
            now,
            confirmed_edit_window: self.confirmed_edit_window,
        });

        let mut merged = merge(&current, request, &grant);
        merged.updated_at = now;
        if merged.service_date != current.service_date
            || merged.duration_hours != current.duration_hours
        {
            check_schedule(merged.service_date, merged.end_date, merged.duration_hours)?;
        }

        let outcome = self
            .store
            .update_booking(&BookingUpdate {
                booking: merged,
                expected_version: current.version,
            })
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))?;

        let updated = match outcome {
            UpdateOutcome::Applied(details) => details,
            UpdateOutcome::VersionConflict => return Err(BookingError::Conflict),
            UpdateOutcome::Missing => {
                return Err(BookingError::Persistence(
                    "booking disappeared during update".to_string(),
                ));
            }
        };

        info!(
            booking_id,
            user_id = %caller.id,
            role = %caller.role,
            fields = ?grant.fields,
            version = updated.booking.version,
            "booking updated"
        );

        if intent.is_status_update && updated.booking.status != current.status {
            self.notify_status_change(&updated, caller).await;
        }

        Ok(updated)
    }

    async fn notify_status_change(&self, booking: &BookingDetails, caller: &UserProfile) {
        let contact = contact_for(caller);
        match self.notifier.send_status_update(booking, &contact).await {
            Ok(()) => record_notification(true),
            Err(e) => {
                record_notification(false);
                warn!(
                    booking_id = %booking.booking.id,
                    status = %booking.booking.status,
                    error = %e,
                    "status notification failed"
                );
            }
        }
    }

    /// Delete a booking. Only the owning consumer may do so.
    pub async fn delete(&self, booking_id: &str, caller: &UserProfile) -> Result<String, BookingError> {
        let result = self.apply_delete(booking_id, caller).await;
        observe("delete", &result);
        result
    }

    async fn apply_delete(&self, booking_id: &str, caller: &UserProfile) -> Result<String, BookingError> {
        if caller.role != Role::Consumer {
            return Err(BookingError::Unauthorized);
        }
        verify_booking_access(self.store.as_ref(), booking_id, &caller.id, caller.role).await?;

        let deleted = self
            .store
            .delete_booking(booking_id)
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))?;
        if !deleted {
            return Err(BookingError::NotFound("booking"));
        }
        info!(booking_id, user_id = %caller.id, "booking deleted");
        Ok(booking_id.to_string())
    }

    /// Create a pending booking for a consumer.
    pub async fn create(
        &self,
        caller: &UserProfile,
        request: CreateBookingRequest,
    ) -> Result<BookingDetails, BookingError> {
        let result = self.apply_create(caller, request, Utc::now()).await;
        observe("create", &result);
        result
    }

    async fn apply_create(
        &self,
        caller: &UserProfile,
        request: CreateBookingRequest,
        now: DateTime<Utc>,
    ) -> Result<BookingDetails, BookingError> {
        if caller.role != Role::Consumer {
            return Err(BookingError::Forbidden);
        }
        let duration = check_schedule(request.service_date, request.end_date, request.duration_hours)?;

        let service = self
            .store
            .get_service(&request.service_id)
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))?
            .ok_or(BookingError::NotFound("service"))?;

        let end_date = match request.end_date {
            Some(end) => end,
            None => request
                .service_date
                .checked_add_signed(duration)
                .ok_or_else(|| BookingError::bad_request("duration_hours is out of range"))?,
        };
        let price = service.hourly_rate * request.duration_hours;
        if !price.is_finite() {
            return Err(BookingError::bad_request("duration_hours is out of range"));
        }

        let booking = Booking {
            id: uuid::Uuid::new_v4().to_string(),
            consumer_id: caller.id.clone(),
            vigil_id: service.vigil_id.clone(),
            service_id: service.id.clone(),
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            service_date: request.service_date,
            end_date: Some(end_date),
            duration_hours: request.duration_hours,
            notes: request.notes,
            price,
            currency: service.currency.clone(),
            created_at: now,
            updated_at: now,
            version: 1,
        };

        let created = self
            .store
            .create_booking(&booking)
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()))?;
        info!(booking_id = %created.booking.id, user_id = %caller.id, "booking created");
        Ok(created)
    }

    /// Bookings the caller owns, newest service date first.
    pub async fn list(&self, caller: &UserProfile) -> Result<Vec<BookingDetails>, BookingError> {
        let owner = match caller.role {
            Role::Consumer => BookingOwner::Consumer(caller.id.clone()),
            Role::Vigil => BookingOwner::Vigil(caller.id.clone()),
            Role::Admin => {
                record_request("list", "ok");
                return Ok(Vec::new());
            }
        };
        let result = self
            .store
            .list_bookings(&owner)
            .await
            .map_err(|e| BookingError::Persistence(e.to_string()));
        observe("list", &result);
        result
    }
}

fn observe<T>(operation: &'static str, result: &Result<T, BookingError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.code(),
    };
    record_request(operation, outcome);
}

fn verifier_message(err: VigilaError) -> String {
    match err {
        VigilaError::Payment { message, .. } => message,
        other => other.to_string(),
    }
}

/// Convert fractional hours to a duration, or `None` when it does not fit.
fn hours_to_duration(hours: f64) -> Option<Duration> {
    let millis = (hours * 3_600_000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

/// Shared schedule rules for created and rescheduled bookings. Returns the
/// booking length.
fn check_schedule(
    service_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    duration_hours: f64,
) -> Result<Duration, BookingError> {
    if !(duration_hours.is_finite() && duration_hours > 0.0) {
        return Err(BookingError::bad_request("duration_hours must be greater than zero"));
    }
    let duration = hours_to_duration(duration_hours)
        .ok_or_else(|| BookingError::bad_request("duration_hours is out of range"))?;
    if end_date.is_some_and(|end| end < service_date) {
        return Err(BookingError::bad_request("end_date must not precede service_date"));
    }
    Ok(duration)
}
