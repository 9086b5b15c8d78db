// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking CRUD operations. Reads always return the joined shape.

use rusqlite::{OptionalExtension, Row, params};
use vigila_core::{
    Booking, BookingDetails, BookingOwner, BookingUpdate, Service, UpdateOutcome, VigilaError,
};

use crate::database::{Database, map_tr_err};
use crate::queries::{parse_text, users::user_at};

const DETAILS_SELECT: &str = "SELECT
        b.id, b.consumer_id, b.vigil_id, b.service_id, b.status, b.payment_status,
        b.payment_id, b.service_date, b.end_date, b.duration_hours, b.notes, b.price,
        b.currency, b.created_at, b.updated_at, b.version,
        c.id, c.role, c.email, c.display_name, c.full_name, c.first_name, c.last_name,
        v.id, v.role, v.email, v.display_name, v.full_name, v.first_name, v.last_name,
        s.id, s.vigil_id, s.name, s.description, s.hourly_rate, s.currency
     FROM bookings b
     LEFT JOIN users c ON c.id = b.consumer_id
     LEFT JOIN users v ON v.id = b.vigil_id
     LEFT JOIN services s ON s.id = b.service_id";

const CONSUMER_OFFSET: usize = 16;
const VIGIL_OFFSET: usize = 23;
const SERVICE_OFFSET: usize = 30;

fn booking_from_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        consumer_id: row.get(1)?,
        vigil_id: row.get(2)?,
        service_id: row.get(3)?,
        status: parse_text(row, 4)?,
        payment_status: parse_text(row, 5)?,
        payment_id: row.get(6)?,
        service_date: row.get(7)?,
        end_date: row.get(8)?,
        duration_hours: row.get(9)?,
        notes: row.get(10)?,
        price: row.get(11)?,
        currency: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
        version: row.get(15)?,
    })
}

fn service_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<Service>> {
    let Some(id) = row.get::<_, Option<String>>(offset)? else {
        return Ok(None);
    };
    Ok(Some(Service {
        id,
        vigil_id: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        description: row.get(offset + 3)?,
        hourly_rate: row.get(offset + 4)?,
        currency: row.get(offset + 5)?,
    }))
}

fn details_from_row(row: &Row<'_>) -> rusqlite::Result<BookingDetails> {
    Ok(BookingDetails {
        booking: booking_from_row(row)?,
        consumer: user_at(row, CONSUMER_OFFSET)?,
        vigil: user_at(row, VIGIL_OFFSET)?,
        service: service_at(row, SERVICE_OFFSET)?,
    })
}

fn select_details(
    conn: &rusqlite::Connection,
    id: &str,
) -> rusqlite::Result<Option<BookingDetails>> {
    let sql = format!("{DETAILS_SELECT} WHERE b.id = ?1");
    conn.query_row(&sql, params![id], details_from_row).optional()
}

/// Insert a booking and return it joined.
pub async fn create_booking(db: &Database, booking: &Booking) -> Result<BookingDetails, VigilaError> {
    let b = booking.clone();
    db.connection()
        .call(move |conn| -> Result<BookingDetails, rusqlite::Error> {
            conn.execute(
                "INSERT INTO bookings (id, consumer_id, vigil_id, service_id, status, payment_status,
                    payment_id, service_date, end_date, duration_hours, notes, price, currency,
                    created_at, updated_at, version)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    b.id,
                    b.consumer_id,
                    b.vigil_id,
                    b.service_id,
                    b.status.to_string(),
                    b.payment_status.to_string(),
                    b.payment_id,
                    b.service_date,
                    b.end_date,
                    b.duration_hours,
                    b.notes,
                    b.price,
                    b.currency,
                    b.created_at,
                    b.updated_at,
                    b.version,
                ],
            )?;
            select_details(conn, &b.id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a booking by ID, joined with its consumer, vigil and service.
pub async fn get_booking(db: &Database, id: &str) -> Result<Option<BookingDetails>, VigilaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| select_details(conn, &id))
        .await
        .map_err(map_tr_err)
}

/// Compare-and-swap update of the mutable booking columns.
///
/// Identity, party, and price columns are never written here.
pub async fn update_booking(
    db: &Database,
    update: &BookingUpdate,
) -> Result<UpdateOutcome, VigilaError> {
    let b = update.booking.clone();
    let expected_version = update.expected_version;
    db.connection()
        .call(move |conn| -> Result<UpdateOutcome, rusqlite::Error> {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE bookings SET
                    status = ?1, payment_status = ?2, payment_id = ?3, service_date = ?4,
                    end_date = ?5, duration_hours = ?6, notes = ?7, updated_at = ?8,
                    version = version + 1
                 WHERE id = ?9 AND version = ?10",
                params![
                    b.status.to_string(),
                    b.payment_status.to_string(),
                    b.payment_id,
                    b.service_date,
                    b.end_date,
                    b.duration_hours,
                    b.notes,
                    b.updated_at,
                    b.id,
                    expected_version,
                ],
            )?;

            if changed == 0 {
                let exists: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM bookings WHERE id = ?1)",
                    params![b.id],
                    |row| row.get(0),
                )?;
                return Ok(if exists {
                    UpdateOutcome::VersionConflict
                } else {
                    UpdateOutcome::Missing
                });
            }

            let details = select_details(&tx, &b.id)?;
            tx.commit()?;
            Ok(details.map_or(UpdateOutcome::Missing, UpdateOutcome::Applied))
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a booking. Returns whether a row was removed.
pub async fn delete_booking(db: &Database, id: &str) -> Result<bool, VigilaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let removed = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
            Ok(removed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// List bookings for a consumer or vigil, latest service date first.
pub async fn list_bookings(
    db: &Database,
    owner: &BookingOwner,
) -> Result<Vec<BookingDetails>, VigilaError> {
    let (column, user_id) = match owner {
        BookingOwner::Consumer(id) => ("b.consumer_id", id.clone()),
        BookingOwner::Vigil(id) => ("b.vigil_id", id.clone()),
    };
    db.connection()
        .call(move |conn| -> Result<Vec<BookingDetails>, rusqlite::Error> {
            let sql = format!(
                "{DETAILS_SELECT} WHERE {column} = ?1 ORDER BY b.service_date DESC, b.id"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![user_id], details_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{services, users};
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;
    use vigila_core::{BookingStatus, PaymentStatus, Role, UserProfile};

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        for (id, role) in [("c1", Role::Consumer), ("c2", Role::Consumer), ("v1", Role::Vigil)] {
            users::insert_user(
                &db,
                &UserProfile {
                    id: id.to_string(),
                    role,
                    email: format!("{id}@example.org"),
                    display_name: None,
                    full_name: Some(format!("User {id}")),
                    first_name: None,
                    last_name: None,
                },
            )
            .await
            .unwrap();
        }
        services::insert_service(
            &db,
            &Service {
                id: "s1".to_string(),
                vigil_id: "v1".to_string(),
                name: "Night companionship".to_string(),
                description: None,
                hourly_rate: 20.0,
                currency: "EUR".to_string(),
            },
        )
        .await
        .unwrap();
        (db, dir)
    }

    fn make_booking(id: &str, consumer: &str, day: u32) -> Booking {
        let start = Utc.with_ymd_and_hms(2026, 3, day, 18, 0, 0).unwrap();
        Booking {
            id: id.to_string(),
            consumer_id: consumer.to_string(),
            vigil_id: "v1".to_string(),
            service_id: "s1".to_string(),
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            service_date: start,
            end_date: Some(start + Duration::hours(3)),
            duration_hours: 3.0,
            notes: Some("Ring twice".to_string()),
            price: 60.0,
            currency: "EUR".to_string(),
            created_at: start - Duration::days(7),
            updated_at: start - Duration::days(7),
            version: 1,
        }
    }

    #[tokio::test]
    async fn create_returns_joined_record() {
        let (db, _dir) = setup_db().await;
        let details = create_booking(&db, &make_booking("b1", "c1", 1)).await.unwrap();

        assert_eq!(details.booking.id, "b1");
        assert_eq!(details.consumer.as_ref().unwrap().email, "c1@example.org");
        assert_eq!(details.vigil.as_ref().unwrap().role, Role::Vigil);
        assert_eq!(details.service.as_ref().unwrap().name, "Night companionship");
        assert_eq!(details.booking.end_date, make_booking("b1", "c1", 1).end_date);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_booking_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_booking(&db, "missing").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_with_current_version_applies_and_bumps_version() {
        let (db, _dir) = setup_db().await;
        let created = create_booking(&db, &make_booking("b1", "c1", 1)).await.unwrap();

        let mut merged = created.booking.clone();
        merged.status = BookingStatus::Confirmed;
        merged.notes = Some("Gate code 1234".to_string());
        let outcome = update_booking(
            &db,
            &BookingUpdate {
                booking: merged,
                expected_version: 1,
            },
        )
        .await
        .unwrap();

        let UpdateOutcome::Applied(details) = outcome else {
            panic!("expected Applied, got {outcome:?}");
        };
        assert_eq!(details.booking.status, BookingStatus::Confirmed);
        assert_eq!(details.booking.notes.as_deref(), Some("Gate code 1234"));
        assert_eq!(details.booking.version, 2);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict_and_writes_nothing() {
        let (db, _dir) = setup_db().await;
        let created = create_booking(&db, &make_booking("b1", "c1", 1)).await.unwrap();

        let mut merged = created.booking.clone();
        merged.status = BookingStatus::Cancelled;
        let outcome = update_booking(
            &db,
            &BookingUpdate {
                booking: merged,
                expected_version: 7,
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome, UpdateOutcome::VersionConflict);

        let stored = get_booking(&db, "b1").await.unwrap().unwrap();
        assert_eq!(stored.booking.status, BookingStatus::Pending);
        assert_eq!(stored.booking.version, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_never_touches_price_or_parties() {
        let (db, _dir) = setup_db().await;
        let created = create_booking(&db, &make_booking("b1", "c1", 1)).await.unwrap();

        let mut merged = created.booking.clone();
        merged.price = 1.0;
        merged.consumer_id = "c2".to_string();
        update_booking(
            &db,
            &BookingUpdate {
                booking: merged,
                expected_version: 1,
            },
        )
        .await
        .unwrap();

        let stored = get_booking(&db, "b1").await.unwrap().unwrap();
        assert_eq!(stored.booking.price, 60.0);
        assert_eq!(stored.booking.consumer_id, "c1");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_of_missing_row_reports_missing() {
        let (db, _dir) = setup_db().await;
        let outcome = update_booking(
            &db,
            &BookingUpdate {
                booking: make_booking("ghost", "c1", 1),
                expected_version: 1,
            },
        )
        .await
        .unwrap();
        assert_eq!(outcome, UpdateOutcome::Missing);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_filters_by_owner_and_orders_by_date() {
        let (db, _dir) = setup_db().await;
        create_booking(&db, &make_booking("b1", "c1", 1)).await.unwrap();
        create_booking(&db, &make_booking("b2", "c1", 9)).await.unwrap();
        create_booking(&db, &make_booking("b3", "c2", 5)).await.unwrap();

        let mine = list_bookings(&db, &BookingOwner::Consumer("c1".into()))
            .await
            .unwrap();
        let ids: Vec<_> = mine.iter().map(|d| d.booking.id.as_str()).collect();
        assert_eq!(ids, ["b2", "b1"]);

        let vigil = list_bookings(&db, &BookingOwner::Vigil("v1".into()))
            .await
            .unwrap();
        assert_eq!(vigil.len(), 3);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let (db, _dir) = setup_db().await;
        create_booking(&db, &make_booking("b1", "c1", 1)).await.unwrap();
        assert!(delete_booking(&db, "b1").await.unwrap());
        assert!(!delete_booking(&db, "b1").await.unwrap());
        assert!(get_booking(&db, "b1").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}
