// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ownership check shared by every single-booking operation.

use vigila_core::{BookingDetails, BookingStore, Role};

use crate::error::AccessError;

/// Load `booking_id` and confirm `user_id` owns it in the capacity `role`
/// grants: consumers must match `consumer_id`, vigils must match
/// `vigil_id`. Every other role is refused.
pub async fn verify_booking_access(
    store: &dyn BookingStore,
    booking_id: &str,
    user_id: &str,
    role: Role,
) -> Result<BookingDetails, AccessError> {
    let details = store
        .get_booking(booking_id)
        .await
        .map_err(AccessError::Store)?
        .ok_or(AccessError::NotFound)?;

    let owner = match role {
        Role::Consumer => &details.booking.consumer_id,
        Role::Vigil => &details.booking.vigil_id,
        Role::Admin => return Err(AccessError::Forbidden),
    };
    if owner != user_id {
        tracing::debug!(booking_id, user_id, %role, "ownership mismatch");
        return Err(AccessError::Forbidden);
    }
    Ok(details)
}
