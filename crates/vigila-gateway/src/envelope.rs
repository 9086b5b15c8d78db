// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The JSON response envelope and the mapping from booking errors to HTTP.
//!
//! Every API response has the shape
//! `{"code": ..., "data"?: ..., "success": bool, "error"?: ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use vigila_booking::BookingError;

pub const SUCCESS_CODE: &str = "SUCCESS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: SUCCESS_CODE.to_string(),
            data: Some(data),
            success: true,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            data: None,
            success: false,
            error: Some(message.into()),
        }
    }
}

/// A successful response with an explicit status.
pub struct Success<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for Success<T> {
    fn into_response(self) -> Response {
        (self.0, Json(ApiResponse::ok(self.1))).into_response()
    }
}

/// A [`BookingError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub BookingError);

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

/// HTTP status for each booking error.
pub fn status_for(err: &BookingError) -> StatusCode {
    match err {
        BookingError::BadRequest(_) | BookingError::PaymentVerification(_) => {
            StatusCode::BAD_REQUEST
        }
        BookingError::Unauthorized => StatusCode::UNAUTHORIZED,
        BookingError::Forbidden => StatusCode::FORBIDDEN,
        BookingError::NotFound(_) => StatusCode::NOT_FOUND,
        BookingError::Conflict => StatusCode::CONFLICT,
        BookingError::Persistence(_) | BookingError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = match &self.0 {
            BookingError::Persistence(detail) => {
                tracing::error!(detail = %detail, "booking persistence failed");
                self.0.to_string()
            }
            BookingError::Internal(detail) => {
                tracing::error!(detail = %detail, "unexpected booking error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ApiResponse::<()>::failure(self.0.code(), message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_table() {
        let cases = [
            (BookingError::bad_request("x"), 400),
            (BookingError::Unauthorized, 401),
            (BookingError::Forbidden, 403),
            (BookingError::NotFound("booking"), 404),
            (BookingError::PaymentVerification("declined".into()), 400),
            (BookingError::Conflict, 409),
            (BookingError::Persistence("disk".into()), 500),
            (BookingError::Internal("boom".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err).as_u16(), status, "{err:?}");
        }
    }

    #[test]
    fn success_envelope_omits_error() {
        let value = serde_json::to_value(ApiResponse::ok("b1")).unwrap();
        assert_eq!(value["code"], "SUCCESS");
        assert_eq!(value["success"], true);
        assert_eq!(value["data"], "b1");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn failure_envelope_omits_data() {
        let value = serde_json::to_value(ApiResponse::<()>::failure("CONFLICT", "stale")).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "stale");
        assert!(value.get("data").is_none());
    }
}
