//! LDAP backend configuration.
//!
//! ## Security Requirements
//!
//! **CRITICAL**: Only LDAPS (LDAP over TLS) is supported.
//!
//! - Connection URLs MUST start with `ldaps://`
//! - STARTTLS is NOT supported (vulnerable to downgrade attacks)
//! - Plain `ldap://` is NOT supported (credentials transmitted in cleartext)

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LdapError, LdapResult};

/// Maps bag keys to directory attribute names.
///
/// The required attributes always have a directory counterpart. The
/// optional ones may be absent from the schema entirely; an unmapped
/// optional attribute gets a neutral value in the fetched bag instead of
/// a directory read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeMap {
    /// Attribute carrying the login username (default `uid`).
    pub username: String,

    /// Email attribute (default `mail`).
    pub email: String,

    /// First name attribute (default `givenName`).
    pub first_name: String,

    /// Last name attribute (default `sn`).
    pub last_name: String,

    /// Lock flag attribute, if the directory models account locking.
    ///
    /// When unmapped, fetched identities are reported as not locked.
    pub locked: Option<String>,

    /// Account expiry attribute.
    pub expires_at: Option<String>,

    /// Last login attribute.
    pub last_login: Option<String>,

    /// Verification timestamp attribute.
    pub verified_at: Option<String>,

    /// Credential expiry attribute.
    pub credentials_expire_at: Option<String>,
}

impl Default for AttributeMap {
    fn default() -> Self {
        Self {
            username: "uid".to_string(),
            email: "mail".to_string(),
            first_name: "givenName".to_string(),
            last_name: "sn".to_string(),
            locked: None,
            expires_at: None,
            last_login: None,
            verified_at: None,
            credentials_expire_at: None,
        }
    }
}

/// LDAP search scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchScope {
    /// Search only the base DN.
    Base,
    /// Search one level below the base DN.
    OneLevel,
    /// Search the entire subtree.
    #[default]
    Subtree,
}

impl SearchScope {
    /// Converts to ldap3 scope.
    #[must_use]
    pub const fn to_ldap3(self) -> ldap3::Scope {
        match self {
            Self::Base => ldap3::Scope::Base,
            Self::OneLevel => ldap3::Scope::OneLevel,
            Self::Subtree => ldap3::Scope::Subtree,
        }
    }
}

/// LDAP backend configuration.
///
/// ## Security Requirements
///
/// The `connection_url` MUST use the `ldaps://` scheme. Any attempt to
/// use `ldap://` or STARTTLS is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdapConfig {
    /// LDAP server URL (MUST be ldaps://).
    pub connection_url: String,

    /// Bind DN for the service account.
    pub bind_dn: String,

    /// Bind credential (password).
    #[serde(skip_serializing)]
    pub bind_credential: String,

    /// Base DN for user searches.
    pub users_dn: String,

    /// User object class filter.
    pub user_object_classes: Vec<String>,

    /// Directory UUID attribute used as the external ID.
    pub uuid_attribute: String,

    /// Bag key to directory attribute mapping.
    pub attributes: AttributeMap,

    /// Custom filter ANDed into every user search.
    pub custom_user_filter: Option<String>,

    /// Search scope.
    pub search_scope: SearchScope,

    /// Maximum connections in the pool.
    pub pool_max_size: usize,

    /// Connection timeout.
    pub connection_timeout: Duration,

    /// Read timeout for operations.
    pub read_timeout: Duration,
}

impl LdapConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> LdapConfigBuilder {
        LdapConfigBuilder::new()
    }

    /// Validates the configuration.
    ///
    /// ## Security
    ///
    /// This method enforces LDAPS-only connections.
    pub fn validate(&self) -> LdapResult<()> {
        validate_ldaps_url(&self.connection_url)?;

        if self.bind_dn.is_empty() {
            return Err(LdapError::config("bind_dn cannot be empty"));
        }
        if self.users_dn.is_empty() {
            return Err(LdapError::config("users_dn cannot be empty"));
        }
        if self.user_object_classes.is_empty() {
            return Err(LdapError::config("user_object_classes cannot be empty"));
        }
        if self.pool_max_size == 0 {
            return Err(LdapError::config("pool_max_size must be at least 1"));
        }

        Ok(())
    }

    /// Gets the object-class search filter for users.
    #[must_use]
    pub fn user_search_filter(&self) -> String {
        let object_classes: Vec<String> = self
            .user_object_classes
            .iter()
            .map(|c| format!("(objectClass={c})"))
            .collect();

        let base_filter = if object_classes.len() == 1 {
            object_classes[0].clone()
        } else {
            format!("(&{})", object_classes.join(""))
        };

        match &self.custom_user_filter {
            Some(custom) => format!("(&{base_filter}{custom})"),
            None => base_filter,
        }
    }

    /// Gets the full user search filter for a username.
    #[must_use]
    pub fn user_by_username_filter(&self, username: &str) -> String {
        let base = self.user_search_filter();
        let username_attr = &self.attributes.username;
        let escaped = ldap_escape(username);
        format!("(&{base}({username_attr}={escaped}))")
    }

    /// Attribute names a user search requests from the directory.
    #[must_use]
    pub fn fetch_attribute_names(&self) -> Vec<&str> {
        let attrs = &self.attributes;
        let mut names = vec![
            attrs.username.as_str(),
            attrs.email.as_str(),
            attrs.first_name.as_str(),
            attrs.last_name.as_str(),
            self.uuid_attribute.as_str(),
        ];
        for optional in [
            &attrs.locked,
            &attrs.expires_at,
            &attrs.last_login,
            &attrs.verified_at,
            &attrs.credentials_expire_at,
        ] {
            if let Some(name) = optional {
                names.push(name.as_str());
            }
        }
        names
    }
}

/// Validates that a URL uses LDAPS.
///
/// ## Security
///
/// **CRITICAL**: Only `ldaps://` URLs are accepted.
fn validate_ldaps_url(url: &str) -> LdapResult<()> {
    if !url.to_lowercase().starts_with("ldaps://") {
        return Err(LdapError::InsecureProtocol);
    }
    // "ldaps://" alone has no host
    if url.len() <= 8 {
        return Err(LdapError::config("Invalid LDAPS URL: missing host"));
    }
    Ok(())
}

/// Escapes special characters in LDAP filter values (RFC 4515).
pub(crate) fn ldap_escape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\5c"),
            '*' => result.push_str("\\2a"),
            '(' => result.push_str("\\28"),
            ')' => result.push_str("\\29"),
            '\0' => result.push_str("\\00"),
            _ => result.push(c),
        }
    }
    result
}

/// Builder for [`LdapConfig`].
#[derive(Debug)]
pub struct LdapConfigBuilder {
    connection_url: Option<String>,
    bind_dn: Option<String>,
    bind_credential: Option<String>,
    users_dn: Option<String>,
    user_object_classes: Vec<String>,
    uuid_attribute: String,
    attributes: AttributeMap,
    custom_user_filter: Option<String>,
    search_scope: SearchScope,
    pool_max_size: usize,
    connection_timeout: Duration,
    read_timeout: Duration,
}

impl Default for LdapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LdapConfigBuilder {
    /// Creates a new builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connection_url: None,
            bind_dn: None,
            bind_credential: None,
            users_dn: None,
            user_object_classes: vec!["inetOrgPerson".to_string()],
            uuid_attribute: "entryUUID".to_string(),
            attributes: AttributeMap::default(),
            custom_user_filter: None,
            search_scope: SearchScope::default(),
            pool_max_size: 10,
            connection_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the connection URL (must be ldaps://).
    #[must_use]
    pub fn connection_url(mut self, url: impl Into<String>) -> Self {
        self.connection_url = Some(url.into());
        self
    }

    /// Sets the bind DN.
    #[must_use]
    pub fn bind_dn(mut self, dn: impl Into<String>) -> Self {
        self.bind_dn = Some(dn.into());
        self
    }

    /// Sets the bind credential (password).
    #[must_use]
    pub fn bind_credential(mut self, credential: impl Into<String>) -> Self {
        self.bind_credential = Some(credential.into());
        self
    }

    /// Sets the users DN.
    #[must_use]
    pub fn users_dn(mut self, dn: impl Into<String>) -> Self {
        self.users_dn = Some(dn.into());
        self
    }

    /// Sets the user object classes.
    #[must_use]
    pub fn user_object_classes(mut self, classes: Vec<String>) -> Self {
        self.user_object_classes = classes;
        self
    }

    /// Sets the UUID attribute (e.g. `objectGUID` for Active Directory).
    #[must_use]
    pub fn uuid_attribute(mut self, attr: impl Into<String>) -> Self {
        self.uuid_attribute = attr.into();
        self
    }

    /// Sets the attribute mapping.
    #[must_use]
    pub fn attributes(mut self, map: AttributeMap) -> Self {
        self.attributes = map;
        self
    }

    /// Sets the custom user search filter.
    #[must_use]
    pub fn custom_user_filter(mut self, filter: impl Into<String>) -> Self {
        self.custom_user_filter = Some(filter.into());
        self
    }

    /// Sets the search scope.
    #[must_use]
    pub const fn search_scope(mut self, scope: SearchScope) -> Self {
        self.search_scope = scope;
        self
    }

    /// Sets the maximum pool size.
    #[must_use]
    pub const fn pool_max_size(mut self, max: usize) -> Self {
        self.pool_max_size = max;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Sets the read timeout.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns an error if required fields are missing or the connection
    /// URL does not use LDAPS.
    pub fn build(self) -> LdapResult<LdapConfig> {
        let config = LdapConfig {
            connection_url: self
                .connection_url
                .ok_or_else(|| LdapError::config("connection_url is required"))?,
            bind_dn: self
                .bind_dn
                .ok_or_else(|| LdapError::config("bind_dn is required"))?,
            bind_credential: self
                .bind_credential
                .ok_or_else(|| LdapError::config("bind_credential is required"))?,
            users_dn: self
                .users_dn
                .ok_or_else(|| LdapError::config("users_dn is required"))?,
            user_object_classes: self.user_object_classes,
            uuid_attribute: self.uuid_attribute,
            attributes: self.attributes,
            custom_user_filter: self.custom_user_filter,
            search_scope: self.search_scope,
            pool_max_size: self.pool_max_size,
            connection_timeout: self.connection_timeout,
            read_timeout: self.read_timeout,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_builder() -> LdapConfigBuilder {
        LdapConfig::builder()
            .bind_dn("cn=admin,dc=example,dc=com")
            .bind_credential("password")
            .users_dn("ou=users,dc=example,dc=com")
    }

    #[test]
    fn rejects_plain_ldap_url() {
        let result = base_builder()
            .connection_url("ldap://ldap.example.com:389")
            .build();

        assert!(matches!(result.unwrap_err(), LdapError::InsecureProtocol));
    }

    #[test]
    fn rejects_hostless_ldaps_url() {
        let result = base_builder().connection_url("ldaps://").build();
        assert!(matches!(result.unwrap_err(), LdapError::Configuration(_)));
    }

    #[test]
    fn accepts_ldaps_url() {
        let result = base_builder()
            .connection_url("ldaps://ldap.example.com:636")
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn ldap_escape_special_chars() {
        assert_eq!(ldap_escape("john*"), "john\\2a");
        assert_eq!(ldap_escape("(admin)"), "\\28admin\\29");
        assert_eq!(ldap_escape("user\\name"), "user\\5cname");
        assert_eq!(ldap_escape("normal"), "normal");
    }

    #[test]
    fn username_filter_escapes_and_scopes() {
        let config = base_builder()
            .connection_url("ldaps://ldap.example.com:636")
            .build()
            .unwrap();

        let filter = config.user_by_username_filter("jd(oe)");
        assert!(filter.contains("uid=jd\\28oe\\29"));
        assert!(filter.contains("objectClass=inetOrgPerson"));
    }

    #[test]
    fn custom_filter_is_anded_in() {
        let config = base_builder()
            .connection_url("ldaps://ldap.example.com:636")
            .custom_user_filter("(memberOf=cn=shop,ou=groups,dc=example,dc=com)")
            .build()
            .unwrap();

        let filter = config.user_search_filter();
        assert!(filter.starts_with("(&"));
        assert!(filter.contains("memberOf=cn=shop"));
    }

    #[test]
    fn fetch_attributes_include_mapped_optionals() {
        let mut map = AttributeMap::default();
        map.locked = Some("nsAccountLock".to_string());
        map.last_login = Some("lastLogonTimestamp".to_string());

        let config = base_builder()
            .connection_url("ldaps://ldap.example.com:636")
            .attributes(map)
            .build()
            .unwrap();

        let names = config.fetch_attribute_names();
        assert!(names.contains(&"uid"));
        assert!(names.contains(&"mail"));
        assert!(names.contains(&"entryUUID"));
        assert!(names.contains(&"nsAccountLock"));
        assert!(names.contains(&"lastLogonTimestamp"));
        assert!(!names.contains(&"pwdAccountLockedTime"));
    }
}
