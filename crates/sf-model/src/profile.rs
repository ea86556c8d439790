//! Profile domain model.
//!
//! A profile holds person-level data (name, email, locale). Profiles are
//! keyed by email: several accounts may conceptually share one, and the
//! federation layer creates at most one per distinct email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person-level record, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier.
    pub id: Uuid,
    /// Email address (unique within the store).
    pub email: String,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Locale code (e.g., "en_US").
    pub locale_code: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Creates a new profile for the given email.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email: email.into(),
            first_name: None,
            last_name: None,
            locale_code: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Sets the locale code.
    #[must_use]
    pub fn with_locale_code(mut self, locale: impl Into<String>) -> Self {
        self.locale_code = Some(locale.into());
        self
    }

    /// Gets the full name, if any name parts are set.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_has_defaults() {
        let profile = Profile::new("j@x.com");

        assert_eq!(profile.email, "j@x.com");
        assert!(profile.first_name.is_none());
        assert!(profile.last_name.is_none());
        assert!(profile.locale_code.is_none());
    }

    #[test]
    fn full_name_handles_partial() {
        let both = Profile::new("a@x.com")
            .with_first_name("Jane")
            .with_last_name("Doe");
        assert_eq!(both.full_name(), Some("Jane Doe".to_string()));

        let first_only = Profile::new("b@x.com").with_first_name("Jane");
        assert_eq!(first_only.full_name(), Some("Jane".to_string()));

        let none = Profile::new("c@x.com");
        assert_eq!(none.full_name(), None);
    }
}
