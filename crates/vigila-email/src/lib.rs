// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking status notifications.
//!
//! [`SmtpNotifier`] delivers plain-text emails through an SMTP relay;
//! [`LogNotifier`] stands in when email is disabled.

pub mod log;
pub mod message;
pub mod smtp;

pub use log::LogNotifier;
pub use smtp::SmtpNotifier;
