//! Federation error types.

use thiserror::Error;

use crate::identity::IdentityKind;

/// Errors that can occur during federation operations.
#[derive(Debug, Error)]
pub enum FederationError {
    /// The directory has no identity for the requested username.
    ///
    /// This is an expected outcome for unknown users, not an internal
    /// fault; authentication callers map it to an "unknown user" result.
    #[error("Identity not found in directory: {0}")]
    IdentityNotFound(String),

    /// The attribute fetcher omitted a key the reconciler reads.
    ///
    /// Treated as fatal misconfiguration of the directory mapping; never
    /// retried or defaulted.
    #[error("Missing directory attribute: {0}")]
    MissingAttribute(String),

    /// An attribute value could not be coerced to its expected type.
    #[error("Invalid format for attribute '{attribute}': '{value}'")]
    InvalidFormat {
        /// Attribute name.
        attribute: String,
        /// Offending value.
        value: String,
    },

    /// Refresh was called with an identity this provider cannot update.
    ///
    /// Non-local identities are immutable here; synchronizing onto them is
    /// meaningless, so the caller has a wiring bug.
    #[error("Unsupported identity kind for refresh: {0}")]
    UnsupportedIdentityKind(IdentityKind),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection error to the directory.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Protocol error reported by the directory.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Internal error.
    #[error("Internal federation error: {0}")]
    Internal(String),

    /// Storage error while persisting federated users.
    #[error("Storage error: {0}")]
    Storage(#[from] sf_store::StorageError),
}

impl FederationError {
    /// Creates an identity not found error.
    #[must_use]
    pub fn identity_not_found(username: impl Into<String>) -> Self {
        Self::IdentityNotFound(username.into())
    }

    /// Creates a missing attribute error.
    #[must_use]
    pub fn missing_attribute(name: impl Into<String>) -> Self {
        Self::MissingAttribute(name.into())
    }

    /// Creates an invalid format error.
    #[must_use]
    pub fn invalid_format(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidFormat {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Checks if this is an identity not found error.
    #[must_use]
    pub const fn is_identity_not_found(&self) -> bool {
        matches!(self, Self::IdentityNotFound(_))
    }

    /// Checks if this is an attribute error (missing key or bad format).
    #[must_use]
    pub const fn is_attribute_error(&self) -> bool {
        matches!(self, Self::MissingAttribute(_) | Self::InvalidFormat { .. })
    }
}

/// Result type for federation operations.
pub type FederationResult<T> = Result<T, FederationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        assert!(FederationError::identity_not_found("jdoe").is_identity_not_found());
        assert!(FederationError::missing_attribute("locked").is_attribute_error());
        assert!(FederationError::invalid_format("locked", "maybe").is_attribute_error());
        assert!(!FederationError::Configuration("bad".to_string()).is_attribute_error());
    }

    #[test]
    fn storage_error_converts() {
        let store_err = sf_store::StorageError::duplicate("Account", "username", "jdoe");
        let err: FederationError = store_err.into();
        assert!(matches!(err, FederationError::Storage(_)));
    }
}
