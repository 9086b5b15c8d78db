// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router behaviour against in-memory collaborators: status mapping for
//! store failures, lost races and degraded health.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use vigila_booking::BookingService;
use vigila_core::{BookingStatus, Role};
use vigila_gateway::{GatewayState, HealthState, build_router};
use vigila_test_utils::fixtures;
use vigila_test_utils::{MockAuth, MockBookingStore, MockNotifier, MockPaymentVerifier};

const TOKEN: &str = "consumer-token";

async fn setup() -> (Router, Arc<MockBookingStore>) {
    let store = Arc::new(MockBookingStore::new());
    let consumer = fixtures::user("c1", Role::Consumer);
    store.add_user(consumer.clone()).await;
    store.add_user(fixtures::user("v1", Role::Vigil)).await;
    store.add_service(fixtures::service("s1", "v1", 20.0)).await;
    store
        .add_booking(fixtures::booking("b1", "c1", "v1", "s1", BookingStatus::Pending))
        .await;

    let auth = Arc::new(MockAuth::new());
    auth.add_token(TOKEN, consumer).await;

    let service = BookingService::new(
        store.clone(),
        Arc::new(MockPaymentVerifier::accepting()),
        Arc::new(MockNotifier::new()),
    );
    let router = build_router(GatewayState {
        service: Arc::new(service),
        auth,
        health: HealthState::new(None),
    });
    (router, store)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn get_returns_enveloped_booking() {
    let (router, _) = setup().await;
    let (status, body) = send(&router, "GET", "/api/v1/bookings/b1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "SUCCESS");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], "b1");
    assert_eq!(body["data"]["vigil"]["id"], "v1");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn lost_race_is_409() {
    let (router, store) = setup().await;
    store.race_next_update();

    let (status, body) = send(
        &router,
        "PUT",
        "/api/v1/bookings/b1",
        Some(json!({"id": "b1", "notes": "late change"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    assert_ne!(
        store.booking("b1").await.unwrap().notes.as_deref(),
        Some("late change")
    );
}

#[tokio::test]
async fn store_read_failure_is_500_persistence_error() {
    let (router, store) = setup().await;
    store.fail_reads(true);

    let (status, body) = send(&router, "GET", "/api/v1/bookings/b1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "PERSISTENCE_ERROR");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn store_write_failure_is_500_and_writes_nothing() {
    let (router, store) = setup().await;
    store.fail_writes(true);

    let (status, body) = send(
        &router,
        "PUT",
        "/api/v1/bookings/b1",
        Some(json!({"id": "b1", "status": "CANCELLED"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "PERSISTENCE_ERROR");
    assert_eq!(
        store.booking("b1").await.unwrap().status,
        BookingStatus::Pending
    );
}

#[tokio::test]
async fn empty_json_body_on_create_is_400() {
    let (router, _) = setup().await;
    let (status, body) = send(&router, "POST", "/api/v1/bookings", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn empty_booking_id_is_enveloped_400() {
    let (router, store) = setup().await;
    for method in ["GET", "PUT", "DELETE"] {
        let (status, body) = send(&router, method, "/api/v1/bookings/", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["success"], false);
    }
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn health_degrades_when_store_is_unhealthy() {
    let (router, store) = setup().await;

    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    store.fail_reads(true);
    let (_, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn metrics_disabled_is_404() {
    let (router, _) = setup().await;
    let (status, _) = send(&router, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
