//! The identity reconciler.
//!
//! [`DirectoryUserProvider`] turns a directory-authenticated identity into
//! the single canonical local [`Account`] for its username: creating a
//! linked [`Profile`]/[`Account`] pair on first login, and overwriting the
//! synchronized attribute set from current directory state on every
//! subsequent login.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sf_model::{canonicalize, Account, Profile};
use sf_store::{AccountStore, ProfileStore};
use uuid::Uuid;

use crate::attributes::{keys, AttributeBag};
use crate::coerce;
use crate::config::ProviderConfig;
use crate::error::{FederationError, FederationResult};
use crate::identity::{AuthIdentity, DirectoryIdentity, IdentityKind};
use crate::source::{AttributeFetcher, DirectoryIdentitySource};
use crate::sync;

/// Fully coerced directory attribute values for one identity.
///
/// All reads and coercions complete before any store write, so a failed
/// coercion can never leave partially synchronized state behind.
#[derive(Debug, Clone)]
struct DirectoryShape {
    username: String,
    username_canonical: String,
    email: String,
    email_canonical: String,
    first_name: String,
    last_name: String,
    locked: bool,
    expires_at: Option<DateTime<Utc>>,
    last_login: Option<DateTime<Utc>>,
    verified_at: Option<DateTime<Utc>>,
    credentials_expire_at: Option<DateTime<Utc>>,
}

impl DirectoryShape {
    fn from_bag(username: &str, bag: &AttributeBag) -> FederationResult<Self> {
        let email = bag.require(keys::EMAIL)?.to_string();

        // The directory may omit explicit canonical forms; derive them.
        let email_canonical = match bag.require(keys::EMAIL_CANONICAL)? {
            "" => canonicalize(&email),
            value => value.to_string(),
        };
        let username_canonical = match bag.require(keys::USERNAME_CANONICAL)? {
            "" => canonicalize(username),
            value => value.to_string(),
        };

        Ok(Self {
            username: username.to_string(),
            username_canonical,
            email_canonical,
            email,
            first_name: bag.require(keys::FIRST_NAME)?.to_string(),
            last_name: bag.require(keys::LAST_NAME)?.to_string(),
            locked: coerce::to_bool(keys::LOCKED, bag.require(keys::LOCKED)?)?,
            expires_at: coerce::to_datetime(keys::EXPIRES_AT, bag.require(keys::EXPIRES_AT)?)?,
            last_login: coerce::to_datetime(keys::LAST_LOGIN, bag.require(keys::LAST_LOGIN)?)?,
            verified_at: coerce::to_datetime(keys::VERIFIED_AT, bag.require(keys::VERIFIED_AT)?)?,
            credentials_expire_at: coerce::to_datetime(
                keys::CREDENTIALS_EXPIRE_AT,
                bag.require(keys::CREDENTIALS_EXPIRE_AT)?,
            )?,
        })
    }

    fn first_name_opt(&self) -> Option<String> {
        (!self.first_name.is_empty()).then(|| self.first_name.clone())
    }

    fn last_name_opt(&self) -> Option<String> {
        (!self.last_name.is_empty()).then(|| self.last_name.clone())
    }

    /// Builds the directory-shaped account for this identity.
    fn to_account(&self, profile_id: Uuid) -> Account {
        let mut account =
            Account::new(profile_id, &self.username, &self.email).with_locked(self.locked);
        account.username_canonical = self.username_canonical.clone();
        account.email_canonical = self.email_canonical.clone();
        account.expires_at = self.expires_at;
        account.last_login = self.last_login;
        account.verified_at = self.verified_at;
        account.credentials_expire_at = self.credentials_expire_at;
        account
    }

    /// Builds a new profile for this identity.
    fn to_profile(&self, default_locale: Option<&str>) -> Profile {
        let mut profile = Profile::new(&self.email);
        profile.first_name = self.first_name_opt();
        profile.last_name = self.last_name_opt();
        profile.locale_code = default_locale.map(str::to_string);
        profile
    }
}

/// Reconciles directory identities with the local account store.
///
/// Thread-safe; safe to invoke concurrently for different usernames. A
/// create race for the same new username is resolved through the store's
/// uniqueness constraint: a duplicate on persist means someone else
/// created the row first, and the provider falls back to the
/// lookup-and-synchronize path.
pub struct DirectoryUserProvider<D, F> {
    directory: D,
    fetcher: F,
    accounts: Arc<dyn AccountStore>,
    profiles: Arc<dyn ProfileStore>,
    config: ProviderConfig,
}

impl<D, F> DirectoryUserProvider<D, F>
where
    D: DirectoryIdentitySource,
    F: AttributeFetcher,
{
    /// Creates a provider over the given directory source and stores.
    pub fn new(
        directory: D,
        fetcher: F,
        accounts: Arc<dyn AccountStore>,
        profiles: Arc<dyn ProfileStore>,
        config: ProviderConfig,
    ) -> Self {
        Self {
            directory,
            fetcher,
            accounts,
            profiles,
            config,
        }
    }

    /// Loads the canonical local account for a username.
    ///
    /// Resolves the directory identity, creates the local
    /// `Profile`/`Account` pair if this username is not yet known locally,
    /// and otherwise synchronizes current directory attributes onto the
    /// existing account.
    ///
    /// ## Errors
    ///
    /// - `IdentityNotFound` if the directory has no such username
    /// - `MissingAttribute`/`InvalidFormat` on a broken attribute mapping
    pub async fn load_by_username(&self, username: &str) -> FederationResult<Account> {
        let identity = self.directory.load_by_username(username).await?;
        self.import_identity(&identity).await
    }

    /// Re-applies current directory state onto a previously loaded account.
    ///
    /// Refresh only updates; unlike [`load_by_username`](Self::load_by_username)
    /// it never creates rows. The caller hands in an account it already
    /// holds, so a missing store row is an inconsistency, not a first login.
    ///
    /// ## Errors
    ///
    /// - `UnsupportedIdentityKind` when given anything but a local
    ///   account: non-local identities are immutable here
    /// - `Internal` if the account row is gone from the store
    pub async fn refresh_user(&self, identity: AuthIdentity) -> FederationResult<Account> {
        let account = match identity {
            AuthIdentity::Local(account) => account,
            other => return Err(FederationError::UnsupportedIdentityKind(other.kind())),
        };

        let handle = DirectoryIdentity::new(&account.username);
        let refreshed = self.directory.refresh(&handle).await?;
        let bag = self.fetcher.fetch_attributes(&refreshed).await?;
        let shape = DirectoryShape::from_bag(refreshed.username(), &bag)?;

        let existing = self
            .accounts
            .find_by_username(&shape.username)
            .await?
            .ok_or_else(|| {
                FederationError::internal(format!(
                    "account '{}' no longer present for refresh",
                    shape.username
                ))
            })?;
        self.synchronize_existing(&shape, existing).await
    }

    /// Checks whether the underlying directory source can authenticate
    /// identities of the given kind. Pure pass-through.
    #[must_use]
    pub fn supports_kind(&self, kind: IdentityKind) -> bool {
        self.directory.supports_kind(kind)
    }

    /// Converts a resolved directory identity into the canonical local
    /// account, creating or synchronizing as needed.
    async fn import_identity(&self, identity: &DirectoryIdentity) -> FederationResult<Account> {
        let bag = self.fetcher.fetch_attributes(identity).await?;
        let shape = DirectoryShape::from_bag(identity.username(), &bag)?;

        match self.accounts.find_by_username(&shape.username).await? {
            None => {
                let profile = self.resolve_profile(&shape).await?;
                self.create_account(&shape, &profile).await
            }
            Some(existing) => self.synchronize_existing(&shape, existing).await,
        }
    }

    /// Resolves the profile for a directory email, creating it if absent.
    ///
    /// The new profile is persisted before return so it is visible to
    /// subsequent lookups within the same process.
    async fn resolve_profile(&self, shape: &DirectoryShape) -> FederationResult<Profile> {
        if let Some(profile) = self.profiles.find_by_email(&shape.email).await? {
            return Ok(profile);
        }

        let profile = shape.to_profile(self.config.default_locale.as_deref());
        match self.profiles.create(&profile).await {
            Ok(()) => {
                tracing::debug!(
                    provider = %self.config.name,
                    email = %profile.email,
                    "created profile for directory identity"
                );
                Ok(profile)
            }
            Err(err) if err.is_duplicate() => {
                // Lost a create race; the winner's row is authoritative.
                self.profiles.find_by_email(&shape.email).await?.ok_or_else(|| {
                    FederationError::internal(format!(
                        "profile '{}' missing after duplicate create",
                        shape.email
                    ))
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Creates and persists a new account for a first-time login.
    async fn create_account(
        &self,
        shape: &DirectoryShape,
        profile: &Profile,
    ) -> FederationResult<Account> {
        let account = shape.to_account(profile.id);
        match self.accounts.create(&account).await {
            Ok(()) => {
                tracing::debug!(
                    provider = %self.config.name,
                    username = %account.username,
                    account_id = %account.id,
                    "created account for directory identity"
                );
                Ok(account)
            }
            Err(err) if err.is_duplicate() => {
                tracing::warn!(
                    provider = %self.config.name,
                    username = %shape.username,
                    "account created concurrently; falling back to synchronize"
                );
                let existing = self
                    .accounts
                    .find_by_username(&shape.username)
                    .await?
                    .ok_or_else(|| {
                        FederationError::internal(format!(
                            "account '{}' missing after duplicate create",
                            shape.username
                        ))
                    })?;
                self.synchronize_existing(shape, existing).await
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Synchronizes directory attributes onto an existing account and its
    /// linked profile, then persists both.
    async fn synchronize_existing(
        &self,
        shape: &DirectoryShape,
        mut existing: Account,
    ) -> FederationResult<Account> {
        let source = shape.to_account(existing.profile_id);
        sync::synchronize_accounts(&source, &mut existing);
        self.accounts.update(&existing).await?;

        if let Some(mut target_profile) = self.profiles.find_by_id(existing.profile_id).await? {
            // Profile-level sync carries the directory's current names;
            // the locale stays with the stored profile, since the
            // directory has no locale attribute.
            let mut profile_source = target_profile.clone();
            profile_source.first_name = shape.first_name_opt();
            profile_source.last_name = shape.last_name_opt();
            sync::synchronize_profiles(&profile_source, &mut target_profile);
            self.profiles.update(&target_profile).await?;
        }

        tracing::debug!(
            provider = %self.config.name,
            username = %existing.username,
            account_id = %existing.id,
            "synchronized account from directory"
        );
        Ok(existing)
    }
}
