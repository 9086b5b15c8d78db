// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory booking store for deterministic tests.
//!
//! `MockBookingStore` honours the same version precondition as the SQLite
//! store and can be told to fail reads or writes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use vigila_core::{
    AdapterType, Booking, BookingDetails, BookingOwner, BookingStore, BookingUpdate, HealthStatus,
    PluginAdapter, Service, UpdateOutcome, UserProfile, VigilaError,
};

#[derive(Default)]
struct Tables {
    bookings: HashMap<String, Booking>,
    users: HashMap<String, UserProfile>,
    services: HashMap<String, Service>,
}

#[derive(Default)]
pub struct MockBookingStore {
    tables: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    race_next_update: AtomicBool,
    writes: AtomicUsize,
}

fn injected(op: &str) -> VigilaError {
    VigilaError::Storage {
        source: format!("injected {op} failure").into(),
    }
}

impl MockBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: UserProfile) {
        self.tables.lock().await.users.insert(user.id.clone(), user);
    }

    pub async fn add_service(&self, service: Service) {
        self.tables
            .lock()
            .await
            .services
            .insert(service.id.clone(), service);
    }

    pub async fn add_booking(&self, booking: Booking) {
        self.tables
            .lock()
            .await
            .bookings
            .insert(booking.id.clone(), booking);
    }

    /// Raw stored booking, without joins.
    pub async fn booking(&self, id: &str) -> Option<Booking> {
        self.tables.lock().await.bookings.get(id).cloned()
    }

    /// Simulate a concurrent writer by bumping the stored version.
    pub async fn bump_version(&self, id: &str) {
        if let Some(b) = self.tables.lock().await.bookings.get_mut(id) {
            b.version += 1;
        }
    }

    /// Make the next update lose a race: another writer bumps the version
    /// between the caller's read and its write.
    pub fn race_next_update(&self) {
        self.race_next_update.store(true, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes (update, create, delete).
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<(), VigilaError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), VigilaError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        Ok(())
    }
}

fn join(tables: &Tables, booking: &Booking) -> BookingDetails {
    BookingDetails {
        booking: booking.clone(),
        consumer: tables.users.get(&booking.consumer_id).cloned(),
        vigil: tables.users.get(&booking.vigil_id).cloned(),
        service: tables.services.get(&booking.service_id).cloned(),
    }
}

#[async_trait]
impl PluginAdapter for MockBookingStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, VigilaError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("reads failing".into()));
        }
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl BookingStore for MockBookingStore {
    async fn get_booking(&self, id: &str) -> Result<Option<BookingDetails>, VigilaError> {
        self.check_read()?;
        let tables = self.tables.lock().await;
        Ok(tables.bookings.get(id).map(|b| join(&tables, b)))
    }

    async fn update_booking(&self, update: &BookingUpdate) -> Result<UpdateOutcome, VigilaError> {
        self.check_write()?;
        let mut tables = self.tables.lock().await;
        let Some(stored) = tables.bookings.get_mut(&update.booking.id) else {
            return Ok(UpdateOutcome::Missing);
        };
        if self.race_next_update.swap(false, Ordering::SeqCst) {
            stored.version += 1;
        }
        if stored.version != update.expected_version {
            return Ok(UpdateOutcome::VersionConflict);
        }
        let mut next = update.booking.clone();
        next.version = stored.version + 1;
        *stored = next.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(UpdateOutcome::Applied(join(&tables, &next)))
    }

    async fn delete_booking(&self, id: &str) -> Result<bool, VigilaError> {
        self.check_write()?;
        let removed = self.tables.lock().await.bookings.remove(id).is_some();
        if removed {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }

    async fn create_booking(&self, booking: &Booking) -> Result<BookingDetails, VigilaError> {
        self.check_write()?;
        let mut tables = self.tables.lock().await;
        tables.bookings.insert(booking.id.clone(), booking.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(join(&tables, booking))
    }

    async fn list_bookings(&self, owner: &BookingOwner) -> Result<Vec<BookingDetails>, VigilaError> {
        self.check_read()?;
        let tables = self.tables.lock().await;
        let mut found: Vec<BookingDetails> = tables
            .bookings
            .values()
            .filter(|b| match owner {
                BookingOwner::Consumer(id) => &b.consumer_id == id,
                BookingOwner::Vigil(id) => &b.vigil_id == id,
            })
            .map(|b| join(&tables, b))
            .collect();
        found.sort_by(|a, b| {
            b.booking
                .service_date
                .cmp(&a.booking.service_date)
                .then_with(|| a.booking.id.cmp(&b.booking.id))
        });
        Ok(found)
    }

    async fn get_service(&self, id: &str) -> Result<Option<Service>, VigilaError> {
        self.check_read()?;
        Ok(self.tables.lock().await.services.get(id).cloned())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>, VigilaError> {
        self.check_read()?;
        Ok(self.tables.lock().await.users.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use vigila_core::{BookingStatus, Role};

    #[tokio::test]
    async fn update_enforces_version_precondition() {
        let store = MockBookingStore::new();
        store
            .add_booking(fixtures::booking("b1", "c1", "v1", "s1", BookingStatus::Pending))
            .await;

        let mut booking = store.booking("b1").await.unwrap();
        booking.notes = Some("first".into());
        let outcome = store
            .update_booking(&BookingUpdate {
                booking: booking.clone(),
                expected_version: 1,
            })
            .await
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::Applied(ref d) if d.booking.version == 2));

        let stale = store
            .update_booking(&BookingUpdate {
                booking,
                expected_version: 1,
            })
            .await
            .unwrap();
        assert_eq!(stale, UpdateOutcome::VersionConflict);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn get_joins_users_and_service() {
        let store = MockBookingStore::new();
        store.add_user(fixtures::user("c1", Role::Consumer)).await;
        store.add_service(fixtures::service("s1", "v1", 20.0)).await;
        store
            .add_booking(fixtures::booking("b1", "c1", "v1", "s1", BookingStatus::Pending))
            .await;

        let details = store.get_booking("b1").await.unwrap().unwrap();
        assert_eq!(details.consumer.unwrap().id, "c1");
        assert!(details.vigil.is_none());
        assert_eq!(details.service.unwrap().hourly_rate, 20.0);
    }

    #[tokio::test]
    async fn injected_failures_surface_as_storage_errors() {
        let store = MockBookingStore::new();
        store.fail_reads(true);
        assert!(matches!(
            store.get_booking("b1").await,
            Err(VigilaError::Storage { .. })
        ));
    }
}
