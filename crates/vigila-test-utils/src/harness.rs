// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end HTTP testing.
//!
//! `TestHarness` wires real SQLite storage in a temp directory, mock payment
//! and notification collaborators, the booking service and the gateway
//! router. Requests are driven through the router with `oneshot`, so no
//! socket is bound.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use vigila_booking::BookingService;
use vigila_config::model::StorageConfig;
use vigila_core::{
    AuthAdapter, Booking, BookingDetails, BookingNotifier, BookingStore, PaymentVerifier, Service,
    UserProfile, VigilaError,
};
use vigila_gateway::{GatewayState, HealthState, build_router};
use vigila_storage::SqliteStorage;

use crate::mock_notifier::MockNotifier;
use crate::mock_payment::MockPaymentVerifier;

type RenderFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    verifier: MockPaymentVerifier,
    notifier: MockNotifier,
    confirmed_edit_window_hours: Option<i64>,
    metrics_render: Option<RenderFn>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            verifier: MockPaymentVerifier::accepting(),
            notifier: MockNotifier::new(),
            confirmed_edit_window_hours: None,
            metrics_render: None,
        }
    }

    /// Make every payment verification fail with `message`.
    pub fn with_rejecting_verifier(mut self, message: &str) -> Self {
        self.verifier = MockPaymentVerifier::rejecting(message);
        self
    }

    pub fn with_failing_notifier(mut self) -> Self {
        self.notifier = MockNotifier::failing();
        self
    }

    pub fn with_confirmed_edit_window_hours(mut self, hours: i64) -> Self {
        self.confirmed_edit_window_hours = Some(hours);
        self
    }

    /// Enable `/metrics`, served by `render`.
    pub fn with_metrics_render(mut self, render: RenderFn) -> Self {
        self.metrics_render = Some(render);
        self
    }

    pub async fn build(self) -> Result<TestHarness, VigilaError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| VigilaError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("vigila-test.db");

        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        }));
        storage.initialize().await?;

        let verifier = Arc::new(self.verifier);
        let notifier = Arc::new(self.notifier);

        let mut service = BookingService::new(
            storage.clone() as Arc<dyn BookingStore>,
            verifier.clone() as Arc<dyn PaymentVerifier>,
            notifier.clone() as Arc<dyn BookingNotifier>,
        );
        if let Some(hours) = self.confirmed_edit_window_hours {
            service = service.with_confirmed_edit_window_hours(hours);
        }
        let service = Arc::new(service);

        let router = build_router(GatewayState {
            service: service.clone(),
            auth: storage.clone() as Arc<dyn AuthAdapter>,
            health: HealthState::new(self.metrics_render),
        });

        Ok(TestHarness {
            storage,
            verifier,
            notifier,
            service,
            router,
            _temp_dir: temp_dir,
        })
    }
}

/// A decoded HTTP response.
#[derive(Debug, Clone)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Parsed JSON body; a JSON string for non-JSON bodies, `Null` when empty.
    pub body: Value,
}

impl TestResponse {
    /// The envelope's `code` field.
    pub fn code(&self) -> Option<&str> {
        self.body.get("code").and_then(Value::as_str)
    }

    /// The envelope's `data` field.
    pub fn data(&self) -> &Value {
        self.body.get("data").unwrap_or(&Value::Null)
    }
}

/// A complete booking stack over a temp SQLite database.
pub struct TestHarness {
    pub storage: Arc<SqliteStorage>,
    pub verifier: Arc<MockPaymentVerifier>,
    pub notifier: Arc<MockNotifier>,
    pub service: Arc<BookingService>,
    pub router: Router,
    /// Kept alive so the database outlives the harness.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Insert a user and return a bearer token for them.
    pub async fn add_user(&self, user: &UserProfile) -> Result<String, VigilaError> {
        self.storage.insert_user(user).await?;
        self.storage.issue_token(&user.id, None).await
    }

    pub async fn add_service(&self, service: &Service) -> Result<(), VigilaError> {
        self.storage.insert_service(service).await
    }

    /// Insert a booking directly, bypassing the API.
    pub async fn insert_booking(&self, booking: &Booking) -> Result<BookingDetails, VigilaError> {
        self.storage.create_booking(booking).await
    }

    pub async fn stored_booking(&self, id: &str) -> Result<Option<BookingDetails>, VigilaError> {
        self.storage.get_booking(id).await
    }

    /// Send a request with an optional bearer token and JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse, VigilaError> {
        let raw = body.map(|v| v.to_string());
        self.request_raw(method, uri, token, raw.as_deref()).await
    }

    /// Send a request with an arbitrary (possibly malformed) body.
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> Result<TestResponse, VigilaError> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(raw) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(raw.to_string())
            }
            None => Body::empty(),
        };
        let request = builder
            .body(body)
            .map_err(|e| VigilaError::Internal(format!("invalid test request: {e}")))?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| VigilaError::Internal(format!("router error: {e}")))?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| VigilaError::Internal(format!("failed to read body: {e}")))?
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok(TestResponse { status, body })
    }
}
