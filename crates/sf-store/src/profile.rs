//! Profile storage provider trait.

use async_trait::async_trait;
use sf_model::Profile;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for profile storage operations.
///
/// Profiles are unique by email; implementations must reject a second
/// create for the same canonical email with `StorageError::Duplicate`.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Creates a new profile.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a profile with the same
    /// canonical email already exists.
    async fn create(&self, profile: &Profile) -> StorageResult<()>;

    /// Updates an existing profile.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the profile doesn't exist.
    async fn update(&self, profile: &Profile) -> StorageResult<()>;

    /// Gets a profile by ID.
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Profile>>;

    /// Gets a profile by email (canonical comparison).
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Profile>>;
}
