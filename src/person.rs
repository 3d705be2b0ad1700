//! Fake people: authors, updaters and deleters of documents.

use crate::provider::{choose, ValueProvider};
use serde::{Deserialize, Serialize};

/// Login handles are cut to this many characters
pub const LOGIN_HANDLE_MAX_CHARS: usize = 8;

/// Directory prefix used when a login is stored on a record
pub const LOGIN_DOMAIN: &str = "idir";

/// Regional area codes written over generated phone numbers
pub const REGIONAL_AREA_CODES: &[&str] = &["604", "250", "778", "236", "672"];

/// A synthesized person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonProfile {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub login_handle: String,
    pub phone: String,
    pub fax: String,
    pub cell_phone: String,
}

impl PersonProfile {
    /// Login in the `domain\handle` form kept in audit fields
    pub fn qualified_login(&self) -> String {
        format!("{}\\{}", LOGIN_DOMAIN, self.login_handle)
    }
}

/// Fields the caller wants fixed instead of generated
#[derive(Debug, Clone, Default)]
pub struct PersonOverrides {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
}

impl PersonOverrides {
    pub fn named(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            ..Default::default()
        }
    }
}

/// Build a person, generating whatever `overrides` leaves unset.
///
/// The middle name is present half the time; when present the full name
/// shows its initial half the time, so equal inputs can render differently.
pub fn synthesize_person(
    provider: &mut dyn ValueProvider,
    overrides: &PersonOverrides,
) -> PersonProfile {
    let first = non_empty(&overrides.first_name).unwrap_or_else(|| provider.first_name());
    let middle = match non_empty(&overrides.middle_name) {
        Some(m) => Some(m),
        None if provider.boolean() => Some(provider.first_name()),
        None => None,
    };
    let last = non_empty(&overrides.last_name).unwrap_or_else(|| provider.last_name());

    let middle_part = match middle.as_deref().and_then(|m| m.chars().next()) {
        Some(initial) if provider.boolean() => format!("{}. ", initial),
        _ => String::new(),
    };
    let full_name = format!("{} {}{}", first, middle_part, last);

    let separator = if provider.boolean() { "." } else { "" };
    let email = format!(
        "{}{}{}@{}",
        first.to_lowercase(),
        separator,
        last.to_lowercase(),
        provider.email_domain()
    );

    PersonProfile {
        login_handle: login_handle(&first, &last),
        first_name: first,
        middle_name: middle,
        last_name: last,
        full_name,
        email,
        phone: regional_phone_number(provider),
        fax: regional_phone_number(provider),
        cell_phone: regional_phone_number(provider),
    }
}

/// First initial and last name, lowercased, at most eight characters.
///
/// Distinct people can share a handle; nothing here prevents that.
pub fn login_handle(first: &str, last: &str) -> String {
    first
        .chars()
        .take(1)
        .chain(last.chars())
        .flat_map(char::to_lowercase)
        .take(LOGIN_HANDLE_MAX_CHARS)
        .collect()
}

/// A generic phone number with its first three characters swapped for a regional area code
pub fn regional_phone_number(provider: &mut dyn ValueProvider) -> String {
    let generic: String = provider
        .phone_number()
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .collect();
    let area = choose(provider, REGIONAL_AREA_CODES).copied().unwrap_or("604");
    let rest: String = generic.chars().skip(3).collect();
    format!("{}{}", area, rest)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FakerProvider, Locale};

    #[test]
    fn test_login_handle_truncates() {
        assert_eq!(login_handle("Margaret", "Fitzgerald"), "mfitzger");
        assert_eq!(login_handle("Al", "Li"), "ali");
    }

    #[test]
    fn test_login_handle_collides() {
        assert_eq!(
            login_handle("Jane", "Richardson"),
            login_handle("John", "Richards")
        );
    }

    #[test]
    fn test_phone_uses_regional_area_code() {
        let mut p = FakerProvider::seeded(11, Locale::En);
        for _ in 0..20 {
            let phone = regional_phone_number(&mut p);
            assert!(REGIONAL_AREA_CODES.contains(&&phone[..3]), "{}", phone);
            assert_eq!(phone.len(), 12);
        }
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let mut p = FakerProvider::seeded(2, Locale::En);
        let overrides = PersonOverrides {
            first_name: Some(String::new()),
            ..Default::default()
        };
        let person = synthesize_person(&mut p, &overrides);
        assert!(!person.first_name.is_empty());
    }
}
