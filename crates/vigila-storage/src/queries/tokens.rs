// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token issuance and lookup.
//!
//! Only the SHA-256 digest of a token is stored; the plaintext is returned
//! once by [`issue_token`] and never persisted.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rusqlite::{OptionalExtension, params};
use sha2::{Digest, Sha256};
use vigila_core::{UserProfile, VigilaError};

use crate::database::{Database, map_tr_err};
use crate::queries::users::user_at;

/// Hex-encoded SHA-256 of a plaintext token.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issue a new token for `user_id`, optionally expiring after `ttl`.
///
/// Returns the plaintext token. Fails when the user does not exist.
pub async fn issue_token(
    db: &Database,
    user_id: &str,
    ttl: Option<Duration>,
) -> Result<String, VigilaError> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let user_id = user_id.to_string();
    let now = Utc::now();
    let expires_at = ttl.map(|ttl| now + ttl);

    let inserted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "INSERT INTO auth_tokens (token_hash, user_id, created_at, expires_at)
                 SELECT ?1, id, ?3, ?4 FROM users WHERE id = ?2",
                params![token_hash, user_id, now, expires_at],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if inserted == 0 {
        return Err(VigilaError::Auth("cannot issue token for unknown user".to_string()));
    }
    Ok(token)
}

/// Resolve a plaintext token to its user. Unknown and expired tokens
/// resolve to `None`.
pub async fn find_user_by_token(
    db: &Database,
    token: &str,
) -> Result<Option<UserProfile>, VigilaError> {
    let token_hash = hash_token(token);
    let found = db
        .connection()
        .call(
            move |conn| -> Result<Option<(Option<UserProfile>, Option<DateTime<Utc>>)>, rusqlite::Error> {
                conn.query_row(
                    "SELECT u.id, u.role, u.email, u.display_name, u.full_name,
                            u.first_name, u.last_name, t.expires_at
                     FROM auth_tokens t JOIN users u ON u.id = t.user_id
                     WHERE t.token_hash = ?1",
                    params![token_hash],
                    |row| Ok((user_at(row, 0)?, row.get(7)?)),
                )
                .optional()
            },
        )
        .await
        .map_err(map_tr_err)?;

    Ok(match found {
        Some((user, Some(expires_at))) if expires_at <= Utc::now() => {
            tracing::debug!(user_id = ?user.as_ref().map(|u| &u.id), "rejected expired token");
            None
        }
        Some((user, _)) => user,
        None => None,
    })
}

/// Delete every expired token. Returns the number removed.
pub async fn purge_expired(db: &Database) -> Result<usize, VigilaError> {
    let now = Utc::now();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "DELETE FROM auth_tokens WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                params![now],
            )
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users::insert_user;
    use tempfile::tempdir;
    use vigila_core::Role;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap(), true)
            .await
            .unwrap();
        insert_user(
            &db,
            &UserProfile {
                id: "c1".to_string(),
                role: Role::Consumer,
                email: "maria@example.org".to_string(),
                display_name: Some("Maria".to_string()),
                full_name: None,
                first_name: None,
                last_name: None,
            },
        )
        .await
        .unwrap();
        (db, dir)
    }

    #[test]
    fn hash_is_stable_hex() {
        let h = hash_token("abc");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_token("abc"));
        assert_ne!(h, hash_token("abd"));
    }

    #[tokio::test]
    async fn issued_token_resolves_to_user() {
        let (db, _dir) = setup_db().await;
        let token = issue_token(&db, "c1", None).await.unwrap();
        assert_eq!(token.len(), 64);

        let user = find_user_by_token(&db, &token).await.unwrap().unwrap();
        assert_eq!(user.id, "c1");
        assert_eq!(user.role, Role::Consumer);
        assert!(find_user_by_token(&db, "bogus").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn plaintext_is_not_stored() {
        let (db, _dir) = setup_db().await;
        let token = issue_token(&db, "c1", None).await.unwrap();
        let stored: String = db
            .connection()
            .call(|conn| -> Result<String, rusqlite::Error> {
                conn.query_row("SELECT token_hash FROM auth_tokens", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_ne!(stored, token);
        assert_eq!(stored, hash_token(&token));
    }

    #[tokio::test]
    async fn expired_token_is_rejected_and_purged() {
        let (db, _dir) = setup_db().await;
        let token = issue_token(&db, "c1", Some(Duration::seconds(-1)))
            .await
            .unwrap();
        assert!(find_user_by_token(&db, &token).await.unwrap().is_none());
        assert_eq!(purge_expired(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_user_cannot_get_a_token() {
        let (db, _dir) = setup_db().await;
        let err = issue_token(&db, "ghost", None).await.unwrap_err();
        assert!(matches!(err, VigilaError::Auth(_)));
    }
}
