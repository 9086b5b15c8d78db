// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User profile operations.

use rusqlite::{OptionalExtension, Row, params};
use vigila_core::{UserProfile, VigilaError};

use crate::database::{Database, map_tr_err};
use crate::queries::parse_text;

/// Read a user profile starting at column `offset`; `None` when the
/// left-joined id column is NULL.
pub(crate) fn user_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<UserProfile>> {
    let Some(id) = row.get::<_, Option<String>>(offset)? else {
        return Ok(None);
    };
    Ok(Some(UserProfile {
        id,
        role: parse_text(row, offset + 1)?,
        email: row.get(offset + 2)?,
        display_name: row.get(offset + 3)?,
        full_name: row.get(offset + 4)?,
        first_name: row.get(offset + 5)?,
        last_name: row.get(offset + 6)?,
    }))
}

/// Insert a user profile.
pub async fn insert_user(db: &Database, user: &UserProfile) -> Result<(), VigilaError> {
    let u = user.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO users (id, role, email, display_name, full_name, first_name, last_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    u.id,
                    u.role.to_string(),
                    u.email,
                    u.display_name,
                    u.full_name,
                    u.first_name,
                    u.last_name,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a user profile by ID.
pub async fn get_user(db: &Database, id: &str) -> Result<Option<UserProfile>, VigilaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<UserProfile>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, role, email, display_name, full_name, first_name, last_name
                 FROM users WHERE id = ?1",
                params![id],
                |row| user_at(row, 0),
            )
            .optional()
            .map(Option::flatten)
        })
        .await
        .map_err(map_tr_err)
}
