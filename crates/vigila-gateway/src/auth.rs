// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token authentication.
//!
//! Tokens are resolved to a user profile by the configured [`AuthAdapter`].
//! Missing, malformed and unknown tokens all fail closed with 401.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use vigila_booking::BookingError;
use vigila_core::{AuthAdapter, UserProfile};

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the caller behind the request headers.
pub async fn authenticate(
    auth: &dyn AuthAdapter,
    headers: &HeaderMap,
) -> Result<UserProfile, BookingError> {
    let Some(token) = bearer_token(headers) else {
        return Err(BookingError::Unauthorized);
    };
    match auth.authenticate(token).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            tracing::debug!("rejected unknown bearer token");
            Err(BookingError::Unauthorized)
        }
        Err(e) => Err(BookingError::Internal(format!("token lookup failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn rejects_other_schemes_and_blank_tokens() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
