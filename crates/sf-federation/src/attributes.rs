//! The normalized attribute map delivered by an attribute fetcher.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{FederationError, FederationResult};

/// Attribute keys the reconciler reads.
///
/// Every one of these must be present in a fetched bag; an absent key is a
/// mapping misconfiguration and fails the operation.
pub mod keys {
    /// Email address.
    pub const EMAIL: &str = "email";
    /// Canonical email.
    pub const EMAIL_CANONICAL: &str = "email_canonical";
    /// Canonical username.
    pub const USERNAME_CANONICAL: &str = "username_canonical";
    /// First name.
    pub const FIRST_NAME: &str = "first_name";
    /// Last name.
    pub const LAST_NAME: &str = "last_name";
    /// Lock status (bool-coercible).
    pub const LOCKED: &str = "locked";
    /// Account expiry (datetime-coercible).
    pub const EXPIRES_AT: &str = "expires_at";
    /// Last login (datetime-coercible).
    pub const LAST_LOGIN: &str = "last_login";
    /// Verification time (datetime-coercible).
    pub const VERIFIED_AT: &str = "verified_at";
    /// Credential expiry (datetime-coercible).
    pub const CREDENTIALS_EXPIRE_AT: &str = "credentials_expire_at";

    /// All keys a complete bag carries.
    pub const ALL: &[&str] = &[
        EMAIL,
        EMAIL_CANONICAL,
        USERNAME_CANONICAL,
        FIRST_NAME,
        LAST_NAME,
        LOCKED,
        EXPIRES_AT,
        LAST_LOGIN,
        VERIFIED_AT,
        CREDENTIALS_EXPIRE_AT,
    ];
}

/// A normalized attribute map fetched for one directory identity.
///
/// Values are strings as delivered by the directory mapping; type coercion
/// happens in [`coerce`](crate::coerce). An empty string encodes "no
/// value" for optional datetime attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeBag(HashMap<String, String>);

impl AttributeBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Gets an attribute value, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Gets a required attribute value.
    ///
    /// ## Errors
    ///
    /// Returns `FederationError::MissingAttribute` if the key is absent.
    pub fn require(&self, key: &str) -> FederationResult<&str> {
        self.get(key)
            .ok_or_else(|| FederationError::missing_attribute(key))
    }

    /// Checks if the bag has an attribute.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for AttributeBag {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_present_key() {
        let bag = AttributeBag::new().with(keys::EMAIL, "j@x.com");
        assert_eq!(bag.require(keys::EMAIL).unwrap(), "j@x.com");
    }

    #[test]
    fn require_absent_key_fails() {
        let bag = AttributeBag::new();
        let err = bag.require(keys::LOCKED).unwrap_err();
        assert!(matches!(
            err,
            FederationError::MissingAttribute(key) if key == "locked"
        ));
    }

    #[test]
    fn all_keys_covers_bag_contract() {
        // A bag built with every key satisfies require() for each.
        let bag: AttributeBag = keys::ALL
            .iter()
            .map(|k| ((*k).to_string(), String::new()))
            .collect();
        for key in keys::ALL {
            assert!(bag.require(key).is_ok());
        }
    }
}
