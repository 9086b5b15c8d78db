// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound booking notifications.

use async_trait::async_trait;

use crate::error::VigilaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{BookingDetails, ContactInfo};

/// Sends booking lifecycle emails.
#[async_trait]
pub trait BookingNotifier: PluginAdapter {
    /// Tells `contact` that `booking` moved to its current status.
    async fn send_status_update(
        &self,
        booking: &BookingDetails,
        contact: &ContactInfo,
    ) -> Result<(), VigilaError>;
}
