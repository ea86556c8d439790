//! # sf-federation
//!
//! Directory user federation for the storefront user store.
//!
//! The core of this crate is [`DirectoryUserProvider`], the identity
//! reconciler: given a directory-authenticated identity it finds or
//! creates the corresponding local [`Account`](sf_model::Account) and
//! keeps a fixed attribute set synchronized with the directory on every
//! login.
//!
//! The directory transport itself is behind the
//! [`DirectoryIdentitySource`] and [`AttributeFetcher`] traits; see the
//! `sf-federation-ldap` crate for the LDAP implementation.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod attributes;
pub mod coerce;
pub mod config;
pub mod error;
pub mod identity;
pub mod provider;
pub mod source;
pub mod sync;

pub use attributes::AttributeBag;
pub use config::ProviderConfig;
pub use error::{FederationError, FederationResult};
pub use identity::{AuthIdentity, DirectoryIdentity, IdentityKind};
pub use provider::DirectoryUserProvider;
pub use source::{AttributeFetcher, DirectoryIdentitySource};
