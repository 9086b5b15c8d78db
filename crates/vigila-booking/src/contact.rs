// SPDX-FileCopyrightText: 2026 Vigila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the notification recipient from a user profile.

use vigila_core::{ContactInfo, UserProfile};

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Display name for `profile`: the first non-empty of display name, full
/// name, "first last", first name, then the local part of the email.
pub fn display_name(profile: &UserProfile) -> String {
    let first = non_empty(profile.first_name.as_deref());
    let last = non_empty(profile.last_name.as_deref());

    if let Some(name) = non_empty(profile.display_name.as_deref())
        .or_else(|| non_empty(profile.full_name.as_deref()))
    {
        return name.to_string();
    }
    match (first, last) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(first), None) => first.to_string(),
        _ => profile
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

pub fn contact_for(profile: &UserProfile) -> ContactInfo {
    ContactInfo {
        name: display_name(profile),
        email: profile.email.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigila_core::Role;

    fn profile() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            role: Role::Consumer,
            email: "maria.silva@example.org".into(),
            display_name: None,
            full_name: None,
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn prefers_display_name_then_full_name() {
        let mut p = profile();
        p.full_name = Some("Maria da Silva".into());
        assert_eq!(display_name(&p), "Maria da Silva");
        p.display_name = Some("Mãe".into());
        assert_eq!(display_name(&p), "Mãe");
    }

    #[test]
    fn combines_first_and_last() {
        let mut p = profile();
        p.first_name = Some("Maria".into());
        assert_eq!(display_name(&p), "Maria");
        p.last_name = Some("Silva".into());
        assert_eq!(display_name(&p), "Maria Silva");
    }

    #[test]
    fn blank_fields_fall_through_to_email() {
        let mut p = profile();
        p.display_name = Some("   ".into());
        p.last_name = Some("Silva".into());
        let contact = contact_for(&p);
        assert_eq!(contact.name, "maria.silva");
        assert_eq!(contact.email, "maria.silva@example.org");
    }
}
