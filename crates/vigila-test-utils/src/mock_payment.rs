// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock payment verifier that records every call.

use async_trait::async_trait;
use tokio::sync::Mutex;

use vigila_core::{AdapterType, HealthStatus, PaymentVerifier, PluginAdapter, VigilaError};

/// Arguments of one `verify` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCall {
    pub payment_id: String,
    pub payer_id: String,
    pub booking_id: String,
}

/// Accepts every payment, or rejects every payment with a fixed message.
pub struct MockPaymentVerifier {
    rejection: Option<String>,
    calls: Mutex<Vec<VerifyCall>>,
}

impl MockPaymentVerifier {
    pub fn accepting() -> Self {
        Self {
            rejection: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            rejection: Some(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<VerifyCall> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockPaymentVerifier {
    fn default() -> Self {
        Self::accepting()
    }
}

#[async_trait]
impl PluginAdapter for MockPaymentVerifier {
    fn name(&self) -> &str {
        "mock-payments"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Payment
    }

    async fn health_check(&self) -> Result<HealthStatus, VigilaError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl PaymentVerifier for MockPaymentVerifier {
    async fn verify(
        &self,
        payment_id: &str,
        payer_id: &str,
        booking_id: &str,
    ) -> Result<(), VigilaError> {
        self.calls.lock().await.push(VerifyCall {
            payment_id: payment_id.to_string(),
            payer_id: payer_id.to_string(),
            booking_id: booking_id.to_string(),
        });
        match &self.rejection {
            Some(message) => Err(VigilaError::payment(message.clone())),
            None => Ok(()),
        }
    }
}
