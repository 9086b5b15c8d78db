// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Vigila booking service.
//!
//! Exposes the booking endpoints under `/api/v1/bookings`, wraps every
//! result in the JSON envelope, and serves unauthenticated `/health` and
//! `/metrics` endpoints.

pub mod auth;
pub mod envelope;
pub mod handlers;
pub mod server;
pub mod shutdown;

pub use envelope::{ApiError, ApiResponse};
pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};
pub use shutdown::install_signal_handler;
