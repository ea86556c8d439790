//! Directory source traits.
//!
//! These traits are the seam between the reconciler and the directory
//! transport. Implementations live elsewhere (see `sf-federation-ldap`);
//! tests use in-line stubs.

use crate::attributes::AttributeBag;
use crate::error::FederationResult;
use crate::identity::{DirectoryIdentity, IdentityKind};

/// An external directory that authenticates identities by username.
///
/// ## Implementation Notes
///
/// - Implementations must be thread-safe (Send + Sync)
/// - All operations are async to support network I/O
#[allow(async_fn_in_trait)]
pub trait DirectoryIdentitySource: Send + Sync {
    /// Resolves the authoritative identity for a username.
    ///
    /// ## Errors
    ///
    /// Returns `FederationError::IdentityNotFound` if the directory has no
    /// such username.
    async fn load_by_username(&self, username: &str) -> FederationResult<DirectoryIdentity>;

    /// Re-resolves an identity from the directory.
    ///
    /// Directory state may have changed since the identity was first
    /// loaded; the returned handle reflects the current state.
    async fn refresh(&self, identity: &DirectoryIdentity) -> FederationResult<DirectoryIdentity>;

    /// Checks whether this source can authenticate identities of the
    /// given runtime kind.
    fn supports_kind(&self, kind: IdentityKind) -> bool;
}

/// Retrieves the normalized attribute map for a resolved identity.
#[allow(async_fn_in_trait)]
pub trait AttributeFetcher: Send + Sync {
    /// Fetches the attribute bag for an identity.
    ///
    /// A complete bag carries every key in
    /// [`keys::ALL`](crate::attributes::keys::ALL); consumers fail with
    /// `MissingAttribute` on any absent key they read.
    async fn fetch_attributes(&self, identity: &DirectoryIdentity)
        -> FederationResult<AttributeBag>;
}
