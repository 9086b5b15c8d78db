// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait that every collaborator implements.

use async_trait::async_trait;

use crate::error::VigilaError;
use crate::types::{AdapterType, HealthStatus};

/// Identity, health and lifecycle shared by stores, verifiers and notifiers.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    /// Returns the kind of collaborator.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, VigilaError>;

    /// Releases held resources. Defaults to a no-op.
    async fn shutdown(&self) -> Result<(), VigilaError> {
        Ok(())
    }
}
