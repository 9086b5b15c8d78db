// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock status notifier with capture and failure injection.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use vigila_core::{
    AdapterType, BookingDetails, BookingNotifier, BookingStatus, ContactInfo, HealthStatus,
    PluginAdapter, VigilaError,
};

/// One notification handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub booking_id: String,
    pub status: BookingStatus,
    pub contact: ContactInfo,
}

/// Records notifications; when set to fail, records the attempt and
/// returns an error.
#[derive(Default)]
pub struct MockNotifier {
    fail: AtomicBool,
    attempts: Mutex<Vec<SentNotification>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        notifier
    }

    /// Every attempted notification, including failed ones.
    pub async fn attempts(&self) -> Vec<SentNotification> {
        self.attempts.lock().await.clone()
    }

    pub async fn attempt_count(&self) -> usize {
        self.attempts.lock().await.len()
    }
}

#[async_trait]
impl PluginAdapter for MockNotifier {
    fn name(&self) -> &str {
        "mock-notifier"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notification
    }

    async fn health_check(&self) -> Result<HealthStatus, VigilaError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl BookingNotifier for MockNotifier {
    async fn send_status_update(
        &self,
        booking: &BookingDetails,
        contact: &ContactInfo,
    ) -> Result<(), VigilaError> {
        self.attempts.lock().await.push(SentNotification {
            booking_id: booking.booking.id.clone(),
            status: booking.booking.status,
            contact: contact.clone(),
        });
        if self.fail.load(Ordering::SeqCst) {
            return Err(VigilaError::notification("smtp relay unavailable"));
        }
        Ok(())
    }
}
