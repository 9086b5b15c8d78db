// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the booking store and token authenticator.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use vigila_config::model::StorageConfig;
use vigila_core::{
    AdapterType, AuthAdapter, Booking, BookingDetails, BookingOwner, BookingStore, BookingUpdate,
    HealthStatus, PluginAdapter, Service, UpdateOutcome, UserProfile, VigilaError,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened lazily by [`SqliteStorage::initialize`]; every
/// other operation fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, VigilaError> {
        self.db.get().ok_or_else(|| VigilaError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Open the database and apply migrations.
    pub async fn initialize(&self) -> Result<(), VigilaError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| VigilaError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL. The connection itself closes on drop.
    pub async fn close(&self) -> Result<(), VigilaError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    pub async fn insert_user(&self, user: &UserProfile) -> Result<(), VigilaError> {
        queries::users::insert_user(self.db()?, user).await
    }

    pub async fn insert_service(&self, service: &Service) -> Result<(), VigilaError> {
        queries::services::insert_service(self.db()?, service).await
    }

    /// Issue a bearer token for `user_id`. Returns the plaintext.
    pub async fn issue_token(
        &self,
        user_id: &str,
        ttl: Option<chrono::Duration>,
    ) -> Result<String, VigilaError> {
        queries::tokens::issue_token(self.db()?, user_id, ttl).await
    }

    pub async fn purge_expired_tokens(&self) -> Result<usize, VigilaError> {
        queries::tokens::purge_expired(self.db()?).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, VigilaError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VigilaError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl BookingStore for SqliteStorage {
    async fn get_booking(&self, id: &str) -> Result<Option<BookingDetails>, VigilaError> {
        queries::bookings::get_booking(self.db()?, id).await
    }

    async fn update_booking(&self, update: &BookingUpdate) -> Result<UpdateOutcome, VigilaError> {
        queries::bookings::update_booking(self.db()?, update).await
    }

    async fn delete_booking(&self, id: &str) -> Result<bool, VigilaError> {
        queries::bookings::delete_booking(self.db()?, id).await
    }

    async fn create_booking(&self, booking: &Booking) -> Result<BookingDetails, VigilaError> {
        queries::bookings::create_booking(self.db()?, booking).await
    }

    async fn list_bookings(&self, owner: &BookingOwner) -> Result<Vec<BookingDetails>, VigilaError> {
        queries::bookings::list_bookings(self.db()?, owner).await
    }

    async fn get_service(&self, id: &str) -> Result<Option<Service>, VigilaError> {
        queries::services::get_service(self.db()?, id).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>, VigilaError> {
        queries::users::get_user(self.db()?, id).await
    }
}

#[async_trait]
impl AuthAdapter for SqliteStorage {
    async fn authenticate(&self, token: &str) -> Result<Option<UserProfile>, VigilaError> {
        queries::tokens::find_user_by_token(self.db()?, token).await
    }
}
