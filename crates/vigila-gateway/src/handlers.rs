// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the booking API.
//!
//! Handlers validate the path and body before authenticating, so a
//! malformed request is rejected with 400 even without credentials.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use vigila_booking::{BookingError, CreateBookingRequest, UpdateBookingRequest, check_update_target};
use vigila_core::{BookingDetails, HealthStatus};

use crate::auth::authenticate;
use crate::envelope::{ApiError, Success};
use crate::server::GatewayState;

/// Response body for `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

fn require_booking_id(booking_id: &str) -> Result<(), BookingError> {
    if booking_id.trim().is_empty() {
        return Err(BookingError::bad_request("booking id is required"));
    }
    Ok(())
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, BookingError> {
    serde_json::from_slice(body)
        .map_err(|e| BookingError::bad_request(format!("malformed request body: {e}")))
}

/// Any method on `/api/v1/bookings/` with an empty booking id.
pub async fn missing_booking_id() -> ApiError {
    ApiError(BookingError::bad_request("booking id is required"))
}

/// GET /api/v1/bookings/{booking_id}
pub async fn get_booking(
    State(state): State<GatewayState>,
    Path(booking_id): Path<String>,
    headers: HeaderMap,
) -> Result<Success<BookingDetails>, ApiError> {
    require_booking_id(&booking_id)?;
    let caller = authenticate(state.auth.as_ref(), &headers).await?;
    let details = state.service.get(&booking_id, &caller).await?;
    Ok(Success(StatusCode::OK, details))
}

/// PUT /api/v1/bookings/{booking_id}
pub async fn update_booking(
    State(state): State<GatewayState>,
    Path(booking_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Success<BookingDetails>, ApiError> {
    require_booking_id(&booking_id)?;
    let request: UpdateBookingRequest = parse_body(&body)?;
    check_update_target(&booking_id, &request)?;
    let caller = authenticate(state.auth.as_ref(), &headers).await?;
    let updated = state.service.update(&booking_id, &caller, request).await?;
    Ok(Success(StatusCode::OK, updated))
}

/// DELETE /api/v1/bookings/{booking_id}
pub async fn delete_booking(
    State(state): State<GatewayState>,
    Path(booking_id): Path<String>,
    headers: HeaderMap,
) -> Result<Success<String>, ApiError> {
    require_booking_id(&booking_id)?;
    let caller = authenticate(state.auth.as_ref(), &headers).await?;
    let deleted = state.service.delete(&booking_id, &caller).await?;
    Ok(Success(StatusCode::OK, deleted))
}

/// POST /api/v1/bookings
pub async fn create_booking(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Success<BookingDetails>, ApiError> {
    let request: CreateBookingRequest = parse_body(&body)?;
    let caller = authenticate(state.auth.as_ref(), &headers).await?;
    let created = state.service.create(&caller, request).await?;
    Ok(Success(StatusCode::CREATED, created))
}

/// GET /api/v1/bookings
pub async fn list_bookings(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Success<Vec<BookingDetails>>, ApiError> {
    let caller = authenticate(state.auth.as_ref(), &headers).await?;
    let bookings = state.service.list(&caller).await?;
    Ok(Success(StatusCode::OK, bookings))
}

/// GET /health
///
/// Unauthenticated; reports `degraded` when the store health check fails.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let status = match state.service.store().health_check().await {
        Ok(HealthStatus::Healthy) => "ok",
        Ok(other) => {
            tracing::warn!(status = ?other, "store reported unhealthy");
            "degraded"
        }
        Err(e) => {
            tracing::warn!(error = %e, "store health check failed");
            "degraded"
        }
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}

/// GET /metrics
///
/// Prometheus text format; 404 when no recorder is installed.
pub async fn get_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
