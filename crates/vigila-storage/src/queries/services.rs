// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service catalogue operations.

use rusqlite::{OptionalExtension, params};
use vigila_core::{Service, VigilaError};

use crate::database::{Database, map_tr_err};

/// Insert a service offered by a vigil.
pub async fn insert_service(db: &Database, service: &Service) -> Result<(), VigilaError> {
    let s = service.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO services (id, vigil_id, name, description, hourly_rate, currency)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![s.id, s.vigil_id, s.name, s.description, s.hourly_rate, s.currency],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a service by ID.
pub async fn get_service(db: &Database, id: &str) -> Result<Option<Service>, VigilaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Service>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, vigil_id, name, description, hourly_rate, currency
                 FROM services WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Service {
                        id: row.get(0)?,
                        vigil_id: row.get(1)?,
                        name: row.get(2)?,
                        description: row.get(3)?,
                        hourly_rate: row.get(4)?,
                        currency: row.get(5)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}
