//! In-memory store implementations.
//!
//! Backs tests and local wiring. Uniqueness is enforced on canonical
//! username and canonical email, matching what a SQL backend would enforce
//! with unique indexes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sf_model::{canonicalize, Account, Profile};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::account::AccountStore;
use crate::error::{StorageError, StorageResult};
use crate::profile::ProfileStore;

/// In-memory account store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl InMemoryAccountStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Returns true if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, account: &Account) -> StorageResult<()> {
        let mut accounts = self.accounts.write().await;
        for existing in accounts.values() {
            if existing.username_canonical == account.username_canonical {
                return Err(StorageError::duplicate(
                    "Account",
                    "username",
                    &account.username,
                ));
            }
            if existing.email_canonical == account.email_canonical {
                return Err(StorageError::duplicate("Account", "email", &account.email));
            }
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> StorageResult<()> {
        let mut accounts = self.accounts.write().await;
        if !accounts.contains_key(&account.id) {
            return Err(StorageError::not_found("Account", account.id));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StorageResult<Option<Account>> {
        let canonical = canonicalize(username);
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.username_canonical == canonical)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Account>> {
        let canonical = canonicalize(email);
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.email_canonical == canonical)
            .cloned())
    }
}

/// In-memory profile store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<Uuid, Profile>>>,
}

impl InMemoryProfileStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored profiles.
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    /// Returns true if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn create(&self, profile: &Profile) -> StorageResult<()> {
        let mut profiles = self.profiles.write().await;
        let canonical = canonicalize(&profile.email);
        if profiles
            .values()
            .any(|p| canonicalize(&p.email) == canonical)
        {
            return Err(StorageError::duplicate("Profile", "email", &profile.email));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn update(&self, profile: &Profile) -> StorageResult<()> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(&profile.id) {
            return Err(StorageError::not_found("Profile", profile.id));
        }
        profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Profile>> {
        let canonical = canonicalize(email);
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|p| canonicalize(&p.email) == canonical)
            .cloned())
    }
}
