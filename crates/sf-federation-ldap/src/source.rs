//! LDAP-backed directory source.
//!
//! [`LdapDirectory`] implements both federation seams over one shared
//! connection pool: identity resolution
//! ([`DirectoryIdentitySource`]) and attribute fetching
//! ([`AttributeFetcher`]).

use std::sync::Arc;

use sf_federation::attributes::{keys, AttributeBag};
use sf_federation::{
    AttributeFetcher, DirectoryIdentity, DirectoryIdentitySource, FederationResult, IdentityKind,
};

use crate::config::LdapConfig;
use crate::connection::LdapConnectionPool;
use crate::error::LdapError;
use crate::search::{LdapEntry, LdapSearcher};

/// LDAP directory source.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct LdapDirectory {
    pool: Arc<LdapConnectionPool>,
}

impl LdapDirectory {
    /// Creates a directory source over a validated configuration.
    #[must_use]
    pub fn new(config: LdapConfig) -> Self {
        Self {
            pool: Arc::new(LdapConnectionPool::new(config)),
        }
    }

    /// Creates a directory source sharing an existing pool.
    #[must_use]
    pub fn with_pool(pool: Arc<LdapConnectionPool>) -> Self {
        Self { pool }
    }

    async fn find_entry(&self, username: &str) -> FederationResult<Option<LdapEntry>> {
        let mut conn = self.pool.get().await?;
        let mut searcher = LdapSearcher::new(&mut conn, self.pool.config());
        Ok(searcher.find_user_by_username(username).await?)
    }
}

impl DirectoryIdentitySource for LdapDirectory {
    async fn load_by_username(&self, username: &str) -> FederationResult<DirectoryIdentity> {
        let entry = self
            .find_entry(username)
            .await?
            .ok_or_else(|| LdapError::entry_not_found(username))?;

        let mut identity = DirectoryIdentity::new(username).with_dn(entry.dn.clone());
        if let Some(id) = entry.external_id(&self.pool.config().uuid_attribute) {
            identity = identity.with_external_id(id);
        }

        tracing::debug!(username, dn = %entry.dn, "resolved directory identity");
        Ok(identity)
    }

    async fn refresh(&self, identity: &DirectoryIdentity) -> FederationResult<DirectoryIdentity> {
        self.load_by_username(identity.username()).await
    }

    fn supports_kind(&self, kind: IdentityKind) -> bool {
        matches!(kind, IdentityKind::Directory)
    }
}

impl AttributeFetcher for LdapDirectory {
    async fn fetch_attributes(
        &self,
        identity: &DirectoryIdentity,
    ) -> FederationResult<AttributeBag> {
        let entry = self
            .find_entry(identity.username())
            .await?
            .ok_or_else(|| LdapError::entry_not_found(identity.username()))?;

        Ok(bag_from_entry(self.pool.config(), &entry))
    }
}

/// Builds the normalized attribute bag for one directory entry.
///
/// Mapping rules:
/// - `email` is carried only when the entry has it; a consumer requiring
///   it fails with `MissingAttribute` otherwise
/// - canonical forms are left empty for the consumer to derive
/// - names and mapped timestamps fall back to the empty string ("no value")
/// - an absent or unmapped lock attribute reads as not locked
fn bag_from_entry(config: &LdapConfig, entry: &LdapEntry) -> AttributeBag {
    let map = &config.attributes;
    let mut bag = AttributeBag::new()
        .with(keys::EMAIL_CANONICAL, "")
        .with(keys::USERNAME_CANONICAL, "")
        .with(keys::FIRST_NAME, entry.get_attr(&map.first_name).unwrap_or(""))
        .with(keys::LAST_NAME, entry.get_attr(&map.last_name).unwrap_or(""));

    if let Some(email) = entry.get_attr(&map.email) {
        bag.insert(keys::EMAIL, email);
    }

    let locked = map
        .locked
        .as_deref()
        .and_then(|attr| entry.get_attr(attr))
        .unwrap_or("0");
    bag.insert(keys::LOCKED, locked);

    let timestamps = [
        (keys::EXPIRES_AT, &map.expires_at),
        (keys::LAST_LOGIN, &map.last_login),
        (keys::VERIFIED_AT, &map.verified_at),
        (keys::CREDENTIALS_EXPIRE_AT, &map.credentials_expire_at),
    ];
    for (key, attr) in timestamps {
        let value = attr
            .as_deref()
            .and_then(|name| entry.get_attr(name))
            .unwrap_or("");
        bag.insert(key, value);
    }

    bag
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::config::AttributeMap;

    fn config(map: AttributeMap) -> LdapConfig {
        LdapConfig::builder()
            .connection_url("ldaps://ldap.example.com:636")
            .bind_dn("cn=admin,dc=example,dc=com")
            .bind_credential("password")
            .users_dn("ou=users,dc=example,dc=com")
            .attributes(map)
            .build()
            .unwrap()
    }

    fn entry_with(attrs: &[(&str, &str)]) -> LdapEntry {
        LdapEntry {
            dn: "uid=jdoe,ou=users,dc=example,dc=com".to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
                .collect(),
            binary_attributes: HashMap::new(),
        }
    }

    #[test]
    fn bag_carries_complete_key_set() {
        let config = config(AttributeMap::default());
        let entry = entry_with(&[
            ("uid", "jdoe"),
            ("mail", "j@x.com"),
            ("givenName", "Jane"),
            ("sn", "Doe"),
        ]);

        let bag = bag_from_entry(&config, &entry);

        for key in keys::ALL {
            assert!(bag.contains(key), "missing key {key}");
        }
        assert_eq!(bag.get(keys::EMAIL), Some("j@x.com"));
        assert_eq!(bag.get(keys::FIRST_NAME), Some("Jane"));
        assert_eq!(bag.get(keys::LOCKED), Some("0"));
        assert_eq!(bag.get(keys::LAST_LOGIN), Some(""));
        assert_eq!(bag.get(keys::EMAIL_CANONICAL), Some(""));
    }

    #[test]
    fn absent_email_is_omitted() {
        let config = config(AttributeMap::default());
        let entry = entry_with(&[("uid", "jdoe"), ("givenName", "Jane"), ("sn", "Doe")]);

        let bag = bag_from_entry(&config, &entry);

        assert!(!bag.contains(keys::EMAIL));
        assert!(bag.require(keys::EMAIL).is_err());
    }

    #[test]
    fn mapped_lock_attribute_is_read() {
        let mut map = AttributeMap::default();
        map.locked = Some("nsAccountLock".to_string());
        let config = config(map);

        let locked_entry = entry_with(&[("mail", "j@x.com"), ("nsAccountLock", "TRUE")]);
        let bag = bag_from_entry(&config, &locked_entry);
        assert_eq!(bag.get(keys::LOCKED), Some("TRUE"));

        // Absent lock attribute means not locked.
        let unlocked_entry = entry_with(&[("mail", "j@x.com")]);
        let bag = bag_from_entry(&config, &unlocked_entry);
        assert_eq!(bag.get(keys::LOCKED), Some("0"));
    }

    #[test]
    fn mapped_timestamps_are_carried() {
        let mut map = AttributeMap::default();
        map.last_login = Some("lastLogonTimestamp".to_string());
        let config = config(map);

        let entry = entry_with(&[
            ("mail", "j@x.com"),
            ("lastLogonTimestamp", "2024-01-01T00:00:00Z"),
        ]);

        let bag = bag_from_entry(&config, &entry);
        assert_eq!(bag.get(keys::LAST_LOGIN), Some("2024-01-01T00:00:00Z"));
        assert_eq!(bag.get(keys::EXPIRES_AT), Some(""));
    }

    #[test]
    fn supports_directory_kind_only() {
        let directory = LdapDirectory::new(config(AttributeMap::default()));

        assert!(directory.supports_kind(IdentityKind::Directory));
        assert!(!directory.supports_kind(IdentityKind::Local));
    }
}
