// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token-to-user map implementing `AuthAdapter`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use vigila_core::{AdapterType, AuthAdapter, HealthStatus, PluginAdapter, UserProfile, VigilaError};

#[derive(Default)]
pub struct MockAuth {
    tokens: Mutex<HashMap<String, UserProfile>>,
}

impl MockAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_token(&self, token: &str, user: UserProfile) {
        self.tokens.lock().await.insert(token.to_string(), user);
    }
}

#[async_trait]
impl PluginAdapter for MockAuth {
    fn name(&self) -> &str {
        "mock-auth"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, VigilaError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl AuthAdapter for MockAuth {
    async fn authenticate(&self, token: &str) -> Result<Option<UserProfile>, VigilaError> {
        Ok(self.tokens.lock().await.get(token).cloned())
    }
}
