// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator subcommands: `migrate`, `issue-token`, `add-user`, `add-service`.
//!
//! Each command opens the configured database (applying migrations),
//! performs one write, prints the result and checkpoints before exit.

use vigila_config::model::VigilaConfig;
use vigila_core::{Role, Service, UserProfile, VigilaError};
use vigila_storage::SqliteStorage;

async fn open_storage(config: &VigilaConfig) -> Result<SqliteStorage, VigilaError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(storage)
}

/// Run `vigila migrate`.
pub async fn run_migrate(config: &VigilaConfig) -> Result<(), VigilaError> {
    let storage = open_storage(config).await?;
    storage.close().await?;
    println!("database ready: {}", config.storage.database_path);
    Ok(())
}

/// Run `vigila issue-token`. The plaintext token is printed once and never stored.
pub async fn run_issue_token(
    config: &VigilaConfig,
    user_id: &str,
    ttl_hours: Option<i64>,
) -> Result<(), VigilaError> {
    let ttl = match ttl_hours {
        Some(hours) if hours <= 0 => {
            return Err(VigilaError::Config(format!(
                "--ttl-hours must be positive, got {hours}"
            )));
        }
        Some(hours) => Some(chrono::Duration::hours(hours)),
        None => None,
    };

    let storage = open_storage(config).await?;
    let token = storage.issue_token(user_id, ttl).await?;
    storage.close().await?;
    println!("{token}");
    Ok(())
}

/// Name fields for `vigila add-user`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct NameArgs {
    #[arg(long)]
    pub display_name: Option<String>,
    /// Defaults to "<first> <last>" when both are given.
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
}

pub fn new_user(id: Option<String>, role: Role, email: String, names: NameArgs) -> UserProfile {
    let NameArgs {
        display_name,
        full_name,
        first_name,
        last_name,
    } = names;
    let full_name = full_name.or_else(|| match (&first_name, &last_name) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        _ => None,
    });
    UserProfile {
        id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        role,
        email,
        display_name,
        full_name,
        first_name,
        last_name,
    }
}

/// Run `vigila add-user`. Prints the user id.
pub async fn run_add_user(config: &VigilaConfig, user: &UserProfile) -> Result<(), VigilaError> {
    let storage = open_storage(config).await?;
    storage.insert_user(user).await?;
    storage.close().await?;
    println!("{}", user.id);
    Ok(())
}

pub fn new_service(
    id: Option<String>,
    vigil_id: String,
    name: String,
    description: Option<String>,
    hourly_rate: f64,
    currency: String,
) -> Result<Service, VigilaError> {
    if !hourly_rate.is_finite() || hourly_rate <= 0.0 {
        return Err(VigilaError::Config(format!(
            "--hourly-rate must be a positive number, got {hourly_rate}"
        )));
    }
    Ok(Service {
        id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        vigil_id,
        name,
        description,
        hourly_rate,
        currency: currency.to_ascii_uppercase(),
    })
}

/// Run `vigila add-service`. The vigil must already exist and have the VIGIL role.
pub async fn run_add_service(config: &VigilaConfig, service: &Service) -> Result<(), VigilaError> {
    let storage = open_storage(config).await?;
    let vigil = vigila_core::BookingStore::get_user(&storage, &service.vigil_id).await?;
    match vigil {
        Some(user) if user.role == Role::Vigil => {}
        Some(user) => {
            return Err(VigilaError::Config(format!(
                "user {} has role {}, expected VIGIL",
                user.id, user.role
            )));
        }
        None => {
            return Err(VigilaError::Config(format!(
                "no user with id {}",
                service.vigil_id
            )));
        }
    }
    storage.insert_service(service).await?;
    storage.close().await?;
    println!("{}", service.id);
    Ok(())
}
