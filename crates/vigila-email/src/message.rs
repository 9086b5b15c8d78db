// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text status update messages.

use lettre::Message;
use lettre::message::{Mailbox, header::ContentType};
use vigila_core::{BookingDetails, BookingStatus, ContactInfo, VigilaError};

/// Lower-case, space-separated status for prose, e.g. `in progress`.
pub fn status_label(status: BookingStatus) -> String {
    status.to_string().to_lowercase().replace('_', " ")
}

pub fn subject(booking: &BookingDetails) -> String {
    format!("Your Vigila booking is now {}", status_label(booking.booking.status))
}

pub fn body(booking: &BookingDetails, contact: &ContactInfo) -> String {
    let b = &booking.booking;
    let service = booking
        .service
        .as_ref()
        .map(|s| s.name.as_str())
        .unwrap_or("your booking");
    let vigil = booking
        .vigil
        .as_ref()
        .and_then(|v| v.display_name.as_deref().or(v.full_name.as_deref()))
        .map(|name| format!(" with {name}"))
        .unwrap_or_default();

    format!(
        "Hello {name},\n\n\
         The status of {service}{vigil} on {date} is now {status}.\n\n\
         Booking reference: {id}\n\n\
         The Vigila team\n",
        name = contact.name,
        date = b.service_date.format("%Y-%m-%d %H:%M UTC"),
        status = status_label(b.status),
        id = b.id,
    )
}

fn mailbox(name: Option<&str>, email: &str) -> Result<Mailbox, VigilaError> {
    let address = email.parse().map_err(|e| VigilaError::Notification {
        message: format!("invalid email address `{email}`"),
        source: Some(Box::new(e)),
    })?;
    Ok(Mailbox::new(name.map(str::to_string), address))
}

/// Build the status update email for `contact`.
pub fn build_status_message(
    from: &Mailbox,
    booking: &BookingDetails,
    contact: &ContactInfo,
) -> Result<Message, VigilaError> {
    let to = mailbox(Some(&contact.name), &contact.email)?;
    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(subject(booking))
        .header(ContentType::TEXT_PLAIN)
        .body(body(booking, contact))
        .map_err(|e| VigilaError::Notification {
            message: "failed to build status email".to_string(),
            source: Some(Box::new(e)),
        })
}

/// Parse a sender such as `Vigila <no-reply@vigila.app>`.
pub fn parse_sender(from: &str) -> Result<Mailbox, VigilaError> {
    from.parse().map_err(|e| VigilaError::Notification {
        message: format!("invalid sender address `{from}`"),
        source: Some(Box::new(e)),
    })
}
