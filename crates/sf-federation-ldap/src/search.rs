//! LDAP search operations.

use std::collections::HashMap;

use ldap3::SearchEntry;

use crate::config::LdapConfig;
use crate::connection::LdapConnection;
use crate::error::{LdapError, LdapResult};

/// A directory entry with parsed attributes.
#[derive(Debug, Clone)]
pub struct LdapEntry {
    /// Distinguished Name.
    pub dn: String,

    /// Text attributes (all values are multi-valued).
    pub attributes: HashMap<String, Vec<String>>,

    /// Binary attributes.
    pub binary_attributes: HashMap<String, Vec<Vec<u8>>>,
}

impl LdapEntry {
    /// Creates an entry from an ldap3 search result.
    #[must_use]
    pub fn from_search_entry(entry: SearchEntry) -> Self {
        Self {
            dn: entry.dn,
            attributes: entry.attrs,
            binary_attributes: entry.bin_attrs,
        }
    }

    /// Gets the first value of a text attribute.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Gets the first value of a binary attribute.
    #[must_use]
    pub fn get_binary_attr(&self, name: &str) -> Option<&Vec<u8>> {
        self.binary_attributes.get(name).and_then(|v| v.first())
    }

    /// Gets the external ID (UUID attribute value).
    ///
    /// Falls back to the binary form for Active Directory `objectGUID`.
    #[must_use]
    pub fn external_id(&self, uuid_attr: &str) -> Option<String> {
        if let Some(val) = self.get_attr(uuid_attr) {
            return Some(val.to_string());
        }
        self.get_binary_attr(uuid_attr)
            .map(|bytes| format_guid(bytes))
    }
}

/// Formats a binary GUID (Active Directory format) as a string.
fn format_guid(bytes: &[u8]) -> String {
    if bytes.len() != 16 {
        return hex::encode(bytes);
    }

    // Active Directory GUID layout: first three groups little-endian
    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[3], bytes[2], bytes[1], bytes[0],
        bytes[5], bytes[4],
        bytes[7], bytes[6],
        bytes[8], bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

/// User search helper over a checked-out connection.
pub struct LdapSearcher<'a> {
    conn: &'a mut LdapConnection,
    config: &'a LdapConfig,
}

impl<'a> LdapSearcher<'a> {
    /// Creates a new searcher.
    pub fn new(conn: &'a mut LdapConnection, config: &'a LdapConfig) -> Self {
        Self { conn, config }
    }

    /// Finds the single user entry matching a username, if any.
    pub async fn find_user_by_username(&mut self, username: &str) -> LdapResult<Option<LdapEntry>> {
        let filter = self.config.user_by_username_filter(username);
        let attrs = self.config.fetch_attribute_names();
        let users_dn = self.config.users_dn.clone();
        let scope = self.config.search_scope.to_ldap3();

        // Transport failures surface as `Ldap3`; a non-success result
        // code from the server becomes `Search`.
        let (rs, _result) = self
            .conn
            .ldap_mut()
            .with_timeout(self.config.read_timeout)
            .search(&users_dn, scope, &filter, attrs)
            .await?
            .success()
            .map_err(|e| LdapError::Search(format!("Search failed: {e:?}")))?;

        Ok(rs
            .into_iter()
            .next()
            .map(SearchEntry::construct)
            .map(LdapEntry::from_search_entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn entry_attribute_access() {
        let entry = entry_with(&[("uid", "jdoe"), ("mail", "j@x.com")]);

        assert_eq!(entry.get_attr("uid"), Some("jdoe"));
        assert_eq!(entry.get_attr("mail"), Some("j@x.com"));
        assert_eq!(entry.get_attr("missing"), None);
    }

    #[test]
    fn external_id_prefers_text_value() {
        let entry = entry_with(&[("entryUUID", "abc-123")]);
        assert_eq!(entry.external_id("entryUUID"), Some("abc-123".to_string()));
    }

    #[test]
    fn external_id_formats_binary_guid() {
        let mut entry = entry_with(&[]);
        entry.binary_attributes.insert(
            "objectGUID".to_string(),
            vec![vec![
                0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
                0x0E, 0x0F, 0x10,
            ]],
        );

        assert_eq!(
            entry.external_id("objectGUID"),
            Some("04030201-0605-0807-090a-0b0c0d0e0f10".to_string())
        );
    }

    #[test]
    fn odd_length_binary_id_hex_encodes() {
        let mut entry = entry_with(&[]);
        entry
            .binary_attributes
            .insert("entryUUID".to_string(), vec![vec![0xDE, 0xAD, 0xBE]]);

        assert_eq!(entry.external_id("entryUUID"), Some("deadbe".to_string()));
    }
}
