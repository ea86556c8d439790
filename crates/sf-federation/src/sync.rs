//! Attribute synchronization between directory-shaped and local records.
//!
//! Synchronization is a one-directional, field-by-field overwrite of a
//! fixed attribute set: the target's prior values for listed fields are
//! discarded in favor of the source's, and everything else (identifiers,
//! password hash, lock flag, creation time, profile link) is untouched.
//! All source values are fully materialized before the copy, so a sync is
//! never partially applied.

use chrono::Utc;
use sf_model::{Account, Profile};

/// Account fields overwritten by [`synchronize_accounts`].
pub const SYNCED_ACCOUNT_FIELDS: &[&str] = &[
    "email",
    "expires_at",
    "last_login",
    "enabled",
    "verified_at",
    "email_canonical",
    "username",
    "username_canonical",
    "credentials_expire_at",
];

/// Profile fields overwritten by [`synchronize_profiles`].
pub const SYNCED_PROFILE_FIELDS: &[&str] = &["last_name", "first_name", "locale_code"];

/// Copies the fixed account attribute set from `source` onto `target`.
///
/// Copy order is insignificant; the fields are independent. `updated_at`
/// is bumped to record the sync.
pub fn synchronize_accounts(source: &Account, target: &mut Account) {
    target.email = source.email.clone();
    target.expires_at = source.expires_at;
    target.last_login = source.last_login;
    target.enabled = source.enabled;
    target.verified_at = source.verified_at;
    target.email_canonical = source.email_canonical.clone();
    target.username = source.username.clone();
    target.username_canonical = source.username_canonical.clone();
    target.credentials_expire_at = source.credentials_expire_at;
    target.updated_at = Utc::now();
}

/// Copies the profile-level attribute set from `source` onto `target`.
pub fn synchronize_profiles(source: &Profile, target: &mut Profile) {
    target.last_name = source.last_name.clone();
    target.first_name = source.first_name.clone();
    target.locale_code = source.locale_code.clone();
    target.updated_at = Utc::now();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn directory_shaped() -> Account {
        let mut account = Account::new(Uuid::now_v7(), "jdoe", "j@x.com");
        account.enabled = false;
        account.last_login = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        account.verified_at = Some(Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap());
        account
    }

    #[test]
    fn account_sync_copies_listed_fields() {
        let source = directory_shaped();
        let mut target = Account::new(Uuid::now_v7(), "old-name", "old@x.com");

        synchronize_accounts(&source, &mut target);

        assert_eq!(target.email, "j@x.com");
        assert_eq!(target.email_canonical, "j@x.com");
        assert_eq!(target.username, "jdoe");
        assert_eq!(target.username_canonical, "jdoe");
        assert!(!target.enabled);
        assert_eq!(target.last_login, source.last_login);
        assert_eq!(target.verified_at, source.verified_at);
        assert_eq!(target.expires_at, source.expires_at);
        assert_eq!(target.credentials_expire_at, source.credentials_expire_at);
    }

    #[test]
    fn account_sync_leaves_identity_and_credentials_alone() {
        let source = directory_shaped();
        let mut target = Account::new(Uuid::now_v7(), "old-name", "old@x.com");
        target.password_hash = "argon2id$existing-hash".to_string();
        target.locked = true;
        let id = target.id;
        let profile_id = target.profile_id;
        let created_at = target.created_at;

        synchronize_accounts(&source, &mut target);

        assert_eq!(target.id, id);
        assert_eq!(target.profile_id, profile_id);
        assert_eq!(target.created_at, created_at);
        assert_eq!(target.password_hash, "argon2id$existing-hash");
        assert!(target.locked, "locked is not in the synced field set");
    }

    #[test]
    fn profile_sync_copies_names_and_locale() {
        let source = Profile::new("j@x.com")
            .with_first_name("Jane")
            .with_last_name("Doe")
            .with_locale_code("de_DE");
        let mut target = Profile::new("j@x.com")
            .with_first_name("Old")
            .with_last_name("Name");
        let id = target.id;

        synchronize_profiles(&source, &mut target);

        assert_eq!(target.first_name.as_deref(), Some("Jane"));
        assert_eq!(target.last_name.as_deref(), Some("Doe"));
        assert_eq!(target.locale_code.as_deref(), Some("de_DE"));
        assert_eq!(target.id, id);
        assert_eq!(target.email, "j@x.com");
    }

    #[test]
    fn synced_field_lists_are_stable() {
        assert_eq!(SYNCED_ACCOUNT_FIELDS.len(), 9);
        assert!(SYNCED_ACCOUNT_FIELDS.contains(&"enabled"));
        assert!(!SYNCED_ACCOUNT_FIELDS.contains(&"locked"));
        assert_eq!(SYNCED_PROFILE_FIELDS.len(), 3);
    }
}
