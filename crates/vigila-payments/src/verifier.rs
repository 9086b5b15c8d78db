// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `PaymentVerifier` implementations.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::{info, warn};
use vigila_config::model::PaymentsConfig;
use vigila_core::{AdapterType, HealthStatus, PaymentVerifier, PluginAdapter, VigilaError};

use crate::client::PaymentsClient;

const SUCCEEDED: &str = "succeeded";
const INTENT_OBJECT: &str = "payment_intent";

/// Payment intent ids are `pi_` followed by alphanumerics.
fn is_intent_id(payment_id: &str) -> bool {
    payment_id
        .strip_prefix("pi_")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// Verifies payments against a Stripe-compatible payment intents API.
///
/// A payment passes when the id is a payment intent id, the provider returns
/// that same intent, it has succeeded, and its metadata names both the
/// booking and the paying consumer.
pub struct StripePaymentVerifier {
    client: PaymentsClient,
}

impl StripePaymentVerifier {
    pub fn new(config: &PaymentsConfig) -> Result<Self, VigilaError> {
        let key = config.secret_key.clone().ok_or_else(|| {
            VigilaError::Config(
                "payments.secret_key is required when payments.enabled = true".to_string(),
            )
        })?;
        let client = PaymentsClient::new(
            &config.api_base,
            &SecretString::from(key),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for StripePaymentVerifier {
    fn name(&self) -> &str {
        "stripe"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Payment
    }

    async fn health_check(&self) -> Result<HealthStatus, VigilaError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl PaymentVerifier for StripePaymentVerifier {
    async fn verify(
        &self,
        payment_id: &str,
        payer_id: &str,
        booking_id: &str,
    ) -> Result<(), VigilaError> {
        if !is_intent_id(payment_id) {
            warn!(payment_id, booking_id, "malformed payment id");
            return Err(VigilaError::payment("invalid payment id"));
        }

        let intent = self.client.get_payment_intent(payment_id).await?;

        if intent.id != payment_id || intent.object != INTENT_OBJECT {
            warn!(
                payment_id,
                returned_id = %intent.id,
                object = %intent.object,
                "provider returned a different object"
            );
            return Err(VigilaError::payment("payment not found"));
        }
        if intent.status != SUCCEEDED {
            return Err(VigilaError::payment(format!(
                "payment {} has not succeeded (status: {})",
                intent.id, intent.status
            )));
        }
        if intent.metadata_value("booking_id") != Some(booking_id) {
            warn!(payment_id, booking_id, "payment intent names a different booking");
            return Err(VigilaError::payment(
                "payment does not belong to this booking",
            ));
        }
        if intent.metadata_value("consumer_id") != Some(payer_id) {
            warn!(payment_id, payer_id, "payment intent names a different payer");
            return Err(VigilaError::payment("payment was made by a different user"));
        }

        info!(payment_id, booking_id, "payment verified");
        Ok(())
    }
}

/// Rejects every verification. Used when payments are disabled.
#[derive(Debug, Default)]
pub struct DisabledPaymentVerifier;

#[async_trait]
impl PluginAdapter for DisabledPaymentVerifier {
    fn name(&self) -> &str {
        "payments-disabled"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Payment
    }

    async fn health_check(&self) -> Result<HealthStatus, VigilaError> {
        Ok(HealthStatus::Degraded("payments disabled".to_string()))
    }
}

#[async_trait]
impl PaymentVerifier for DisabledPaymentVerifier {
    async fn verify(&self, _: &str, _: &str, _: &str) -> Result<(), VigilaError> {
        Err(VigilaError::payment("payments are disabled"))
    }
}
