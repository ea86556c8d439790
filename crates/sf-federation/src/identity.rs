//! Identity types shared between the directory source and the reconciler.

use std::fmt;

use serde::{Deserialize, Serialize};
use sf_model::Account;

/// Runtime kind of an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityKind {
    /// A locally persisted account.
    Local,
    /// A directory-only identity that has not been materialized locally.
    Directory,
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// An identity resolved by an external directory.
///
/// Opaque handle: only the username is guaranteed stable across calls.
/// The optional DN and external ID let a backend skip a re-search; callers
/// must not rely on them being present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryIdentity {
    username: String,
    dn: Option<String>,
    external_id: Option<String>,
}

impl DirectoryIdentity {
    /// Creates an identity handle for a username.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            dn: None,
            external_id: None,
        }
    }

    /// Attaches the directory DN.
    #[must_use]
    pub fn with_dn(mut self, dn: impl Into<String>) -> Self {
        self.dn = Some(dn.into());
        self
    }

    /// Attaches the directory-assigned external ID.
    #[must_use]
    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// The stable username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The DN, if the backend attached one.
    #[must_use]
    pub fn dn(&self) -> Option<&str> {
        self.dn.as_deref()
    }

    /// The external ID, if the backend attached one.
    #[must_use]
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }
}

/// An identity as presented by the surrounding authentication layer.
///
/// Only local accounts can be refreshed; a directory handle passed to
/// refresh is a caller bug and fails with `UnsupportedIdentityKind`.
#[derive(Debug, Clone)]
pub enum AuthIdentity {
    /// A locally persisted account.
    Local(Account),
    /// A directory-only identity.
    Directory(DirectoryIdentity),
}

impl AuthIdentity {
    /// Returns the runtime kind of this identity.
    #[must_use]
    pub const fn kind(&self) -> IdentityKind {
        match self {
            Self::Local(_) => IdentityKind::Local,
            Self::Directory(_) => IdentityKind::Directory,
        }
    }

    /// Returns the username of this identity.
    #[must_use]
    pub fn username(&self) -> &str {
        match self {
            Self::Local(account) => &account.username,
            Self::Directory(identity) => identity.username(),
        }
    }
}
