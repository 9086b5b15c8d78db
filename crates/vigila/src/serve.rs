// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vigila serve` command implementation.
//!
//! Opens SQLite storage, builds the payment verifier and notifier the
//! configuration asks for, installs the Prometheus recorder and serves the
//! booking API until SIGINT or SIGTERM.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info, warn};
use vigila_booking::BookingService;
use vigila_config::model::{EmailConfig, PaymentsConfig, VigilaConfig};
use vigila_core::{
    AuthAdapter, BookingNotifier, BookingStore, PaymentVerifier, PluginAdapter, VigilaError,
};
use vigila_email::{LogNotifier, SmtpNotifier};
use vigila_gateway::{GatewayState, HealthState, ServerConfig, install_signal_handler, start_server};
use vigila_payments::{DisabledPaymentVerifier, StripePaymentVerifier};
use vigila_storage::SqliteStorage;

type RenderFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Runs the `vigila serve` command.
pub async fn run_serve(config: VigilaConfig) -> Result<(), VigilaError> {
    init_tracing(&config.server.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "starting vigila serve");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    match storage.purge_expired_tokens().await {
        Ok(0) => {}
        Ok(purged) => info!(purged, "removed expired auth tokens"),
        Err(e) => warn!(error = %e, "failed to purge expired auth tokens"),
    }

    let verifier = build_verifier(&config.payments)?;
    let notifier = build_notifier(&config.email)?;
    info!(
        storage = "sqlite",
        payments = verifier.name(),
        notifications = notifier.name(),
        "adapters initialized"
    );

    let prometheus_render = if config.metrics.enabled {
        match install_prometheus() {
            Ok(render) => Some(render),
            Err(e) => {
                warn!(error = %e, "prometheus initialization failed, continuing without metrics");
                None
            }
        }
    } else {
        debug!("prometheus metrics disabled by configuration");
        None
    };

    let service = BookingService::new(
        storage.clone() as Arc<dyn BookingStore>,
        verifier,
        notifier,
    )
    .with_confirmed_edit_window_hours(config.booking.confirmed_edit_window_hours);

    let state = GatewayState {
        service: Arc::new(service),
        auth: storage.clone() as Arc<dyn AuthAdapter>,
        health: HealthState::new(prometheus_render),
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let shutdown = install_signal_handler();
    let served = start_server(&server_config, state, shutdown).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "storage close failed during shutdown");
    }
    info!("vigila stopped");
    served
}

fn build_verifier(config: &PaymentsConfig) -> Result<Arc<dyn PaymentVerifier>, VigilaError> {
    if !config.enabled {
        warn!("payments disabled by configuration, every payment will be rejected");
        return Ok(Arc::new(DisabledPaymentVerifier));
    }
    Ok(Arc::new(StripePaymentVerifier::new(config)?))
}

fn build_notifier(config: &EmailConfig) -> Result<Arc<dyn BookingNotifier>, VigilaError> {
    if !config.enabled {
        debug!("email disabled by configuration, status updates will be logged");
        return Ok(Arc::new(LogNotifier));
    }
    Ok(Arc::new(SmtpNotifier::new(config)?))
}

/// Install the process-wide Prometheus recorder and describe our metrics.
///
/// Only one recorder can be installed per process.
fn install_prometheus() -> Result<RenderFn, VigilaError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| VigilaError::Internal(format!("failed to install Prometheus recorder: {e}")))?;
    vigila_booking::metrics::register_metrics();
    info!("prometheus metrics recorder installed");
    Ok(Arc::new(move || handle.render()))
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vigila={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
