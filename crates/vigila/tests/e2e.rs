// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the booking API.
//!
//! Each test builds an isolated TestHarness over a temp SQLite database with
//! mock payment and notification collaborators, and drives the real router.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;
use vigila_core::{BookingStatus, PaymentStatus, Role};
use vigila_test_utils::TestHarness;
use vigila_test_utils::fixtures::{booking, service, user};

struct Tokens {
    consumer: String,
    other_consumer: String,
    vigil: String,
    admin: String,
}

/// Consumer c1 owns booking b1 (served by vigil v1, service s1 at 20/h).
async fn seed(harness: &TestHarness, status: BookingStatus) -> Tokens {
    let mut consumer = user("c1", Role::Consumer);
    consumer.first_name = Some("Maria".into());
    consumer.last_name = Some("Silva".into());

    let tokens = Tokens {
        consumer: harness.add_user(&consumer).await.unwrap(),
        other_consumer: harness.add_user(&user("c2", Role::Consumer)).await.unwrap(),
        vigil: harness.add_user(&user("v1", Role::Vigil)).await.unwrap(),
        admin: harness.add_user(&user("a1", Role::Admin)).await.unwrap(),
    };
    harness.add_service(&service("s1", "v1", 20.0)).await.unwrap();
    harness
        .insert_booking(&booking("b1", "c1", "v1", "s1", status))
        .await
        .unwrap();
    tokens
}

async fn pending_harness() -> (TestHarness, Tokens) {
    let harness = TestHarness::builder().build().await.unwrap();
    let tokens = seed(&harness, BookingStatus::Pending).await;
    (harness, tokens)
}

// ---- Payment flow ----

#[tokio::test]
async fn consumer_pays_for_pending_booking() {
    let (harness, tokens) = pending_harness().await;

    let response = harness
        .request(
            Method::PUT,
            "/api/v1/bookings/b1",
            Some(&tokens.consumer),
            Some(json!({
                "id": "b1",
                "status": "CONFIRMED",
                "payment_id": "pi_123",
                "payment_status": "PAID"
            })),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.code(), Some("SUCCESS"));
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["status"], "CONFIRMED");
    assert_eq!(response.data()["payment_status"], "PAID");
    assert_eq!(response.data()["payment_id"], "pi_123");
    assert_eq!(response.data()["consumer"]["id"], "c1");
    assert_eq!(response.data()["service"]["id"], "s1");

    let calls = harness.verifier.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].payment_id, "pi_123");
    assert_eq!(calls[0].payer_id, "c1");
    assert_eq!(calls[0].booking_id, "b1");

    let sent = harness.notifier.attempts().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].status, BookingStatus::Confirmed);
    assert_eq!(sent[0].contact.email, "c1@example.org");
    assert_eq!(sent[0].contact.name, "Maria Silva");

    let stored = harness.stored_booking("b1").await.unwrap().unwrap();
    assert_eq!(stored.booking.payment_status, PaymentStatus::Paid);
    assert_eq!(stored.booking.version, 2);
}

#[tokio::test]
async fn rejected_payment_is_400_and_persists_nothing() {
    let harness = TestHarness::builder()
        .with_rejecting_verifier("payment does not belong to this booking")
        .build()
        .await
        .unwrap();
    let tokens = seed(&harness, BookingStatus::Pending).await;

    let response = harness
        .request(
            Method::PUT,
            "/api/v1/bookings/b1",
            Some(&tokens.consumer),
            Some(json!({"id": "b1", "payment_id": "pi_bad", "payment_status": "PAID"})),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), Some("PAYMENT_VERIFICATION_FAILED"));
    assert_eq!(response.body["success"], false);
    assert!(response.body.get("data").is_none());

    let stored = harness.stored_booking("b1").await.unwrap().unwrap();
    assert_eq!(stored.booking.payment_status, PaymentStatus::Pending);
    assert_eq!(stored.booking.payment_id, None);
    assert_eq!(stored.booking.version, 1);
    assert_eq!(harness.notifier.attempt_count().await, 0);
}

#[tokio::test]
async fn payment_without_status_defaults_to_confirmed() {
    let (harness, tokens) = pending_harness().await;

    let response = harness
        .request(
            Method::PUT,
            "/api/v1/bookings/b1",
            Some(&tokens.consumer),
            Some(json!({"id": "b1", "payment_id": "pi_9", "payment_status": "PAID"})),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "CONFIRMED");
}

#[tokio::test]
async fn notifier_failure_does_not_fail_the_update() {
    let harness = TestHarness::builder()
        .with_failing_notifier()
        .build()
        .await
        .unwrap();
    let tokens = seed(&harness, BookingStatus::Pending).await;

    let response = harness
        .request(
            Method::PUT,
            "/api/v1/bookings/b1",
            Some(&tokens.consumer),
            Some(json!({"id": "b1", "status": "CANCELLED"})),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "CANCELLED");
    assert_eq!(harness.notifier.attempt_count().await, 1);
}

// ---- Field policy ----

#[tokio::test]
async fn vigil_cannot_change_price_or_schedule() {
    let (harness, tokens) = pending_harness().await;

    let response = harness
        .request(
            Method::PUT,
            "/api/v1/bookings/b1",
            Some(&tokens.vigil),
            Some(json!({
                "id": "b1",
                "status": "IN_PROGRESS",
                "notes": "On my way",
                "price": 1.0,
                "duration_hours": 10.0
            })),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "IN_PROGRESS");
    assert_eq!(response.data()["notes"], "On my way");
    assert_eq!(response.data()["price"], 60.0);
    assert_eq!(response.data()["duration_hours"], 3.0);
}

#[tokio::test]
async fn unchanged_status_sends_no_notification() {
    let (harness, tokens) = pending_harness().await;

    let response = harness
        .request(
            Method::PUT,
            "/api/v1/bookings/b1",
            Some(&tokens.consumer),
            Some(json!({"id": "b1", "status": "PENDING", "notes": "Ring twice"})),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["notes"], "Ring twice");
    assert_eq!(harness.notifier.attempt_count().await, 0);
}

// ---- Request validation and authentication ----

#[tokio::test]
async fn malformed_body_is_rejected_before_auth() {
    let (harness, _) = pending_harness().await;

    let response = harness
        .request_raw(Method::PUT, "/api/v1/bookings/b1", None, Some("{not json"))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.code(), Some("BAD_REQUEST"));
}

#[tokio::test]
async fn body_id_must_match_path() {
    let (harness, tokens) = pending_harness().await;

    let response = harness
        .request(
            Method::PUT,
            "/api/v1/bookings/b1",
            Some(&tokens.consumer),
            Some(json!({"id": "b2", "status": "CANCELLED"})),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let stored = harness.stored_booking("b1").await.unwrap().unwrap();
    assert_eq!(stored.booking.status, BookingStatus::Pending);
}

#[tokio::test]
async fn missing_or_unknown_token_is_401() {
    let (harness, _) = pending_harness().await;

    let anonymous = harness
        .request(Method::GET, "/api/v1/bookings/b1", None, None)
        .await
        .unwrap();
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.code(), Some("UNAUTHORIZED"));

    let forged = harness
        .request(Method::GET, "/api/v1/bookings/b1", Some("not-a-token"), None)
        .await
        .unwrap();
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
}

// ---- Ownership ----

#[tokio::test]
async fn non_owners_get_403_without_data() {
    let (harness, tokens) = pending_harness().await;

    for token in [&tokens.other_consumer, &tokens.admin] {
        let response = harness
            .request(Method::GET, "/api/v1/bookings/b1", Some(token), None)
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.code(), Some("FORBIDDEN"));
        assert!(response.body.get("data").is_none());
    }

    let update = harness
        .request(
            Method::PUT,
            "/api/v1/bookings/b1",
            Some(&tokens.other_consumer),
            Some(json!({"id": "b1", "status": "CANCELLED"})),
        )
        .await
        .unwrap();
    assert_eq!(update.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_booking_is_404_on_every_method() {
    let (harness, tokens) = pending_harness().await;

    let get = harness
        .request(Method::GET, "/api/v1/bookings/nope", Some(&tokens.consumer), None)
        .await
        .unwrap();
    assert_eq!(get.status, StatusCode::NOT_FOUND);
    assert_eq!(get.code(), Some("NOT_FOUND"));

    let put = harness
        .request(
            Method::PUT,
            "/api/v1/bookings/nope",
            Some(&tokens.consumer),
            Some(json!({"id": "nope", "notes": "x"})),
        )
        .await
        .unwrap();
    assert_eq!(put.status, StatusCode::NOT_FOUND);

    let delete = harness
        .request(Method::DELETE, "/api/v1/bookings/nope", Some(&tokens.consumer), None)
        .await
        .unwrap();
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
}

// ---- Delete, create, list ----

#[tokio::test]
async fn only_the_owning_consumer_deletes() {
    let (harness, tokens) = pending_harness().await;

    let by_vigil = harness
        .request(Method::DELETE, "/api/v1/bookings/b1", Some(&tokens.vigil), None)
        .await
        .unwrap();
    assert_eq!(by_vigil.status, StatusCode::UNAUTHORIZED);
    assert!(harness.stored_booking("b1").await.unwrap().is_some());

    let by_owner = harness
        .request(Method::DELETE, "/api/v1/bookings/b1", Some(&tokens.consumer), None)
        .await
        .unwrap();
    assert_eq!(by_owner.status, StatusCode::OK);
    assert_eq!(by_owner.data(), "b1");
    assert!(harness.stored_booking("b1").await.unwrap().is_none());
}

#[tokio::test]
async fn consumer_creates_and_lists_bookings() {
    let (harness, tokens) = pending_harness().await;

    let created = harness
        .request(
            Method::POST,
            "/api/v1/bookings",
            Some(&tokens.consumer),
            Some(json!({
                "service_id": "s1",
                "service_date": "2026-04-10T09:00:00Z",
                "duration_hours": 2.5,
                "notes": "Morning walk"
            })),
        )
        .await
        .unwrap();

    assert_eq!(created.status, StatusCode::CREATED);
    let data = created.data();
    assert_eq!(data["status"], "PENDING");
    assert_eq!(data["payment_status"], "PENDING");
    assert_eq!(data["vigil_id"], "v1");
    assert_eq!(data["price"], 50.0);
    assert_eq!(data["currency"], "EUR");
    assert_eq!(data["end_date"], "2026-04-10T11:30:00Z");
    assert_eq!(data["version"], 1);

    let listed = harness
        .request(Method::GET, "/api/v1/bookings", Some(&tokens.consumer), None)
        .await
        .unwrap();
    assert_eq!(listed.status, StatusCode::OK);
    let ids: Vec<&str> = listed
        .data()
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|b| b["id"].as_str())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[1], "b1", "newest service_date first");

    let vigil_list = harness
        .request(Method::GET, "/api/v1/bookings", Some(&tokens.vigil), None)
        .await
        .unwrap();
    assert_eq!(vigil_list.data().as_array().unwrap().len(), 2);

    let other = harness
        .request(Method::GET, "/api/v1/bookings", Some(&tokens.other_consumer), None)
        .await
        .unwrap();
    assert!(other.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn vigils_cannot_create_bookings() {
    let (harness, tokens) = pending_harness().await;

    let response = harness
        .request(
            Method::POST,
            "/api/v1/bookings",
            Some(&tokens.vigil),
            Some(json!({
                "service_id": "s1",
                "service_date": "2026-04-10T09:00:00Z",
                "duration_hours": 1.0
            })),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

// ---- Health and metrics ----

#[tokio::test]
async fn health_reports_ok() {
    let (harness, _) = pending_harness().await;

    let response = harness
        .request(Method::GET, "/health", None, None)
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn metrics_are_404_unless_enabled() {
    let (harness, _) = pending_harness().await;
    let response = harness
        .request(Method::GET, "/metrics", None, None)
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let harness = TestHarness::builder()
        .with_metrics_render(Arc::new(|| "vigila_booking_requests_total 3\n".to_string()))
        .build()
        .await
        .unwrap();
    let response = harness
        .request(Method::GET, "/metrics", None, None)
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "vigila_booking_requests_total 3\n");
}
