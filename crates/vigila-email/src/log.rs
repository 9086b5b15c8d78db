// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier used when email is disabled: logs instead of sending.

use async_trait::async_trait;
use tracing::info;
use vigila_core::{
    AdapterType, BookingDetails, BookingNotifier, ContactInfo, HealthStatus, PluginAdapter,
    VigilaError,
};

use crate::message::subject;

#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl PluginAdapter for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notification
    }

    async fn health_check(&self) -> Result<HealthStatus, VigilaError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl BookingNotifier for LogNotifier {
    async fn send_status_update(
        &self,
        booking: &BookingDetails,
        contact: &ContactInfo,
    ) -> Result<(), VigilaError> {
        info!(
            booking_id = %booking.booking.id,
            to = %contact.email,
            subject = %subject(booking),
            "email disabled, status update not sent"
        );
        Ok(())
    }
}
