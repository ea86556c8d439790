//! LDAP-specific error types.
//!
//! ## Security Note
//!
//! Error messages must not leak bind credentials or internal directory
//! structure.

use sf_federation::FederationError;
use thiserror::Error;

/// LDAP-specific errors.
#[derive(Debug, Error)]
pub enum LdapError {
    /// Invalid configuration.
    #[error("LDAP configuration error: {0}")]
    Configuration(String),

    /// Connection URL must use LDAPS.
    #[error("Security error: Only LDAPS is supported. URL must start with 'ldaps://'. STARTTLS and plain LDAP are not allowed.")]
    InsecureProtocol,

    /// Connection failed.
    #[error("LDAP connection failed: {0}")]
    Connection(String),

    /// Bind (service account authentication) failed.
    #[error("LDAP bind failed: {0}")]
    Bind(String),

    /// Search operation failed.
    #[error("LDAP search failed: {0}")]
    Search(String),

    /// No entry matched the requested username.
    #[error("No directory entry for username: {0}")]
    EntryNotFound(String),

    /// Connection pool exhausted.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Underlying ldap3 error.
    #[error("LDAP error: {0}")]
    Ldap3(#[from] ldap3::LdapError),
}

impl LdapError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an entry not found error.
    #[must_use]
    pub fn entry_not_found(username: impl Into<String>) -> Self {
        Self::EntryNotFound(username.into())
    }

    /// Checks if this is a connection-related error.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::PoolExhausted)
    }

    /// Checks if this is a security-related error.
    #[must_use]
    pub const fn is_security_error(&self) -> bool {
        matches!(self, Self::InsecureProtocol | Self::Bind(_))
    }
}

/// Result type for LDAP operations.
pub type LdapResult<T> = Result<T, LdapError>;

impl From<LdapError> for FederationError {
    fn from(err: LdapError) -> Self {
        match err {
            LdapError::Configuration(msg) => FederationError::Configuration(msg),
            LdapError::InsecureProtocol => FederationError::Configuration(err.to_string()),
            LdapError::Connection(msg) => FederationError::Connection(msg),
            LdapError::PoolExhausted => {
                FederationError::Connection("Connection pool exhausted".to_string())
            }
            LdapError::Bind(msg) | LdapError::Search(msg) => FederationError::Protocol(msg),
            LdapError::EntryNotFound(username) => FederationError::IdentityNotFound(username),
            LdapError::Ldap3(e) => FederationError::Protocol(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        assert!(LdapError::InsecureProtocol.is_security_error());
        assert!(LdapError::Bind("bad password".to_string()).is_security_error());

        assert!(LdapError::connection("refused").is_connection_error());
        assert!(LdapError::PoolExhausted.is_connection_error());
        assert!(!LdapError::entry_not_found("jdoe").is_connection_error());
    }

    #[test]
    fn entry_not_found_maps_to_identity_not_found() {
        let err: FederationError = LdapError::entry_not_found("jdoe").into();
        assert!(err.is_identity_not_found());
    }

    #[test]
    fn insecure_protocol_maps_to_configuration() {
        let err: FederationError = LdapError::InsecureProtocol.into();
        assert!(matches!(err, FederationError::Configuration(_)));
    }
}
