// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication adapter trait for resolving bearer tokens.

use async_trait::async_trait;

use crate::error::VigilaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::UserProfile;

/// Resolves a bearer token to the user it was issued for.
#[async_trait]
pub trait AuthAdapter: PluginAdapter {
    /// Returns `Ok(None)` for unknown or expired tokens.
    async fn authenticate(&self, token: &str) -> Result<Option<UserProfile>, VigilaError>;
}
