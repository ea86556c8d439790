//! Account storage provider trait.

use async_trait::async_trait;
use sf_model::Account;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for account storage operations.
///
/// Implementations must be thread-safe and enforce uniqueness on the
/// canonical username and email; callers rely on `Duplicate` errors to
/// detect create races.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Creates a new account.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if an account with the same
    /// canonical username or email already exists.
    async fn create(&self, account: &Account) -> StorageResult<()>;

    /// Updates an existing account.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the account doesn't exist.
    async fn update(&self, account: &Account) -> StorageResult<()>;

    /// Gets an account by ID.
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Account>>;

    /// Gets an account by username (canonical comparison).
    async fn find_by_username(&self, username: &str) -> StorageResult<Option<Account>>;

    /// Gets an account by email (canonical comparison).
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Account>>;
}
