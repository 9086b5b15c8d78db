// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP delivery of booking status updates.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, info};
use vigila_config::model::EmailConfig;
use vigila_core::{
    AdapterType, BookingDetails, BookingNotifier, ContactInfo, HealthStatus, PluginAdapter,
    VigilaError,
};

use crate::message::{build_status_message, parse_sender};

/// Sends status updates through a STARTTLS SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &EmailConfig) -> Result<Self, VigilaError> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| VigilaError::Config("email.smtp_host is required".to_string()))?;
        let from = config
            .from_address
            .as_deref()
            .ok_or_else(|| VigilaError::Config("email.from_address is required".to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| VigilaError::Notification {
                message: format!("invalid SMTP relay `{host}`"),
                source: Some(Box::new(e)),
            })?
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if let (Some(user), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        debug!(host, port = config.smtp_port, "SMTP transport configured");
        Ok(Self {
            transport: builder.build(),
            from: parse_sender(from)?,
        })
    }
}

#[async_trait]
impl PluginAdapter for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notification
    }

    async fn health_check(&self) -> Result<HealthStatus, VigilaError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(HealthStatus::Healthy),
            Ok(false) => Ok(HealthStatus::Degraded("SMTP relay refused NOOP".to_string())),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("SMTP relay unreachable: {e}"))),
        }
    }
}

#[async_trait]
impl BookingNotifier for SmtpNotifier {
    async fn send_status_update(
        &self,
        booking: &BookingDetails,
        contact: &ContactInfo,
    ) -> Result<(), VigilaError> {
        let message = build_status_message(&self.from, booking, contact)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| VigilaError::Notification {
                message: "SMTP delivery failed".to_string(),
                source: Some(Box::new(e)),
            })?;
        info!(
            booking_id = %booking.booking.id,
            status = %booking.booking.status,
            "status email sent"
        );
        Ok(())
    }
}
