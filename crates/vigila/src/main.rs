// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vigila - booking service for the Vigila care marketplace.
//!
//! This is the binary entry point: it loads configuration and dispatches
//! to the `serve`, `doctor` and catalogue subcommands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod doctor;
mod serve;

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use vigila_config::model::VigilaConfig;
use vigila_core::Role;

/// Vigila - booking service for the Vigila care marketplace.
#[derive(Parser, Debug)]
#[command(name = "vigila", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the XDG hierarchy.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the booking API server.
    Serve,
    /// Create the database if needed and apply pending migrations.
    Migrate,
    /// Mint a bearer token for a user and print it once.
    IssueToken {
        /// Id of the user the token authenticates.
        #[arg(long)]
        user: String,
        /// Expire the token after this many hours. Omit for no expiry.
        #[arg(long)]
        ttl_hours: Option<i64>,
    },
    /// Register a user.
    AddUser {
        /// User id. A UUID is generated when omitted.
        #[arg(long)]
        id: Option<String>,
        /// CONSUMER, VIGIL or ADMIN.
        #[arg(long, value_parser = parse_role)]
        role: Role,
        #[arg(long)]
        email: String,
        #[command(flatten)]
        names: admin::NameArgs,
    },
    /// Register a service offered by a vigil.
    AddService {
        /// Service id. A UUID is generated when omitted.
        #[arg(long)]
        id: Option<String>,
        /// Id of the vigil offering the service.
        #[arg(long)]
        vigil: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        hourly_rate: f64,
        #[arg(long, default_value = "EUR")]
        currency: String,
    },
    /// Run diagnostic checks against the configuration and environment.
    Doctor {
        /// Run intensive checks (database integrity, memory).
        #[arg(long)]
        deep: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

fn parse_role(value: &str) -> Result<Role, String> {
    Role::from_str(&value.to_ascii_uppercase())
        .map_err(|_| format!("unknown role `{value}` (expected CONSUMER, VIGIL or ADMIN)"))
}

fn load_config(path: Option<&PathBuf>) -> VigilaConfig {
    let loaded = match path {
        Some(path) => vigila_config::load_and_validate_path(path),
        None => vigila_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            vigila_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("vigila: use --help for available commands");
        return;
    };

    let config = load_config(cli.config.as_ref());

    let result = match command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Migrate => admin::run_migrate(&config).await,
        Commands::IssueToken { user, ttl_hours } => {
            admin::run_issue_token(&config, &user, ttl_hours).await
        }
        Commands::AddUser {
            id,
            role,
            email,
            names,
        } => {
            let user = admin::new_user(id, role, email, names);
            admin::run_add_user(&config, &user).await
        }
        Commands::AddService {
            id,
            vigil,
            name,
            description,
            hourly_rate,
            currency,
        } => match admin::new_service(id, vigil, name, description, hourly_rate, currency) {
            Ok(service) => admin::run_add_service(&config, &service).await,
            Err(e) => Err(e),
        },
        Commands::Doctor { deep, plain } => doctor::run_doctor(&config, deep, plain).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!(parse_role("vigil").unwrap(), Role::Vigil);
        assert_eq!(parse_role("CONSUMER").unwrap(), Role::Consumer);
        assert!(parse_role("owner").is_err());
    }

    #[test]
    fn issue_token_arguments_parse() {
        let cli = Cli::try_parse_from([
            "vigila",
            "--config",
            "/tmp/vigila.toml",
            "issue-token",
            "--user",
            "c1",
            "--ttl-hours",
            "12",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/vigila.toml")));
        match cli.command {
            Some(Commands::IssueToken { user, ttl_hours }) => {
                assert_eq!(user, "c1");
                assert_eq!(ttl_hours, Some(12));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn add_service_defaults_currency() {
        let cli = Cli::try_parse_from([
            "vigila",
            "add-service",
            "--vigil",
            "v1",
            "--name",
            "Night watch",
            "--hourly-rate",
            "22.5",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::AddService { currency, hourly_rate, .. }) => {
                assert_eq!(currency, "EUR");
                assert_eq!(hourly_rate, 22.5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn add_user_accepts_a_full_name() {
        let cli = Cli::try_parse_from([
            "vigila",
            "add-user",
            "--role",
            "consumer",
            "--email",
            "maria@example.org",
            "--full-name",
            "Maria da Silva",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::AddUser { role, names, .. }) => {
                assert_eq!(role, Role::Consumer);
                assert_eq!(names.full_name.as_deref(), Some("Maria da Silva"));
                assert_eq!(names.first_name, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = vigila_config::load_and_validate_str("").expect("defaults should validate");
        assert_eq!(config.server.port, 8080);
    }
}
