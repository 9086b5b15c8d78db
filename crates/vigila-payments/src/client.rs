// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for fetching payment intents.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use vigila_core::VigilaError;

use crate::types::{ApiErrorResponse, PaymentIntent};

#[derive(Debug, Clone)]
pub struct PaymentsClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl PaymentsClient {
    pub fn new(
        base_url: &str,
        secret_key: &SecretString,
        timeout: Duration,
    ) -> Result<Self, VigilaError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", secret_key.expose_secret()))
            .map_err(|e| VigilaError::Config(format!("invalid payments secret key: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| VigilaError::Payment {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let base_url = Url::parse(base_url)
            .map_err(|e| VigilaError::Config(format!("invalid payments api_base `{base_url}`: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(VigilaError::Config(format!(
                "invalid payments api_base `{base_url}`: not a base URL"
            )));
        }

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// The intent URL, with `payment_id` as a single percent-encoded segment.
    fn intent_url(&self, payment_id: &str) -> Result<Url, VigilaError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| VigilaError::Config("payments api_base is not a base URL".to_string()))?
            .pop_if_empty()
            .extend(["v1", "payment_intents"])
            .push(payment_id);
        Ok(url)
    }

    /// Fetch `GET {base}/v1/payment_intents/{id}`.
    pub async fn get_payment_intent(&self, payment_id: &str) -> Result<PaymentIntent, VigilaError> {
        let url = self.intent_url(payment_id)?;
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                VigilaError::Timeout {
                    duration: self.timeout,
                }
            } else {
                VigilaError::Payment {
                    message: format!("payment provider unreachable: {e}"),
                    source: Some(Box::new(e)),
                }
            }
        })?;

        let status = response.status();
        debug!(status = %status, payment_id, "payment intent response received");

        if status == StatusCode::NOT_FOUND {
            return Err(VigilaError::payment("payment not found"));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "payment provider error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message.as_deref().unwrap_or("no message"),
                ),
                Err(_) => format!("payment provider returned {status}"),
            };
            return Err(VigilaError::payment(message));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| VigilaError::Payment {
                message: format!("unreadable payment intent: {e}"),
                source: Some(Box::new(e)),
            })
    }
}
