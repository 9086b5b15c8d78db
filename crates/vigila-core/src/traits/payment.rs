// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment verification trait.

use async_trait::async_trait;

use crate::error::VigilaError;
use crate::traits::adapter::PluginAdapter;

/// Confirms that an external payment reference settles a given booking.
#[async_trait]
pub trait PaymentVerifier: PluginAdapter {
    /// Succeeds only when `payment_id` is a completed payment made by
    /// `payer_id` for `booking_id`. The error message is shown to the caller.
    async fn verify(
        &self,
        payment_id: &str,
        payer_id: &str,
        booking_id: &str,
    ) -> Result<(), VigilaError>;
}
