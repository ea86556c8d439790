//! Account domain model.
//!
//! An account is the authenticatable local record, tied 1:1 to a username
//! and linked to exactly one [`Profile`](crate::Profile). Accounts created
//! from a directory identity carry a password placeholder that can never
//! match a real credential, so local password login cannot succeed for
//! them; the directory is their only authentication path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canonicalize;

/// Password value stored on directory-created accounts.
///
/// Not a valid hash in any supported scheme, so credential verification
/// always fails against it.
pub const DIRECTORY_PASSWORD_PLACEHOLDER: &str = "!directory-only";

/// The authenticatable local user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: Uuid,
    /// Linked profile.
    pub profile_id: Uuid,
    /// Unique username.
    pub username: String,
    /// Canonical (lowercased) username, used for uniqueness.
    pub username_canonical: String,
    /// Email address.
    pub email: String,
    /// Canonical (lowercased) email.
    pub email_canonical: String,
    /// Whether the account may log in.
    pub enabled: bool,
    /// Whether the account is administratively locked.
    pub locked: bool,
    /// Password hash, or a placeholder for directory-only accounts.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the account expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// When the account was verified.
    pub verified_at: Option<DateTime<Utc>>,
    /// When the credentials expire.
    pub credentials_expire_at: Option<DateTime<Utc>>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account linking the given profile.
    ///
    /// Canonical forms default to the lowercased username/email and may be
    /// overwritten afterwards when the directory supplies explicit ones.
    #[must_use]
    pub fn new(profile_id: Uuid, username: impl Into<String>, email: impl Into<String>) -> Self {
        let username = username.into();
        let email = email.into();
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            profile_id,
            username_canonical: canonicalize(&username),
            email_canonical: canonicalize(&email),
            username,
            email,
            enabled: true,
            locked: false,
            password_hash: DIRECTORY_PASSWORD_PLACEHOLDER.to_string(),
            expires_at: None,
            last_login: None,
            verified_at: None,
            credentials_expire_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the locked flag and derives `enabled = !locked`.
    #[must_use]
    pub const fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self.enabled = !locked;
        self
    }

    /// Returns true if the account authenticates through the directory only.
    #[must_use]
    pub fn is_directory_only(&self) -> bool {
        self.password_hash == DIRECTORY_PASSWORD_PLACEHOLDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_has_placeholder_password() {
        let account = Account::new(Uuid::now_v7(), "jdoe", "j@x.com");

        assert!(account.is_directory_only());
        assert!(account.enabled);
        assert!(!account.locked);
        assert_eq!(account.username_canonical, "jdoe");
        assert_eq!(account.email_canonical, "j@x.com");
    }

    #[test]
    fn canonical_forms_are_lowercased() {
        let account = Account::new(Uuid::now_v7(), "JDoe", "J@X.com");

        assert_eq!(account.username, "JDoe");
        assert_eq!(account.username_canonical, "jdoe");
        assert_eq!(account.email_canonical, "j@x.com");
    }

    #[test]
    fn with_locked_disables_account() {
        let account = Account::new(Uuid::now_v7(), "jdoe", "j@x.com").with_locked(true);

        assert!(account.locked);
        assert!(!account.enabled);
    }
}
