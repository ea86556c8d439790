//! # sf-store
//!
//! Storage abstraction for the storefront user store.
//!
//! This crate defines the repository interfaces the federation layer
//! depends on, and a small in-memory implementation backing tests and
//! local wiring.
//!
//! ## Provider Traits
//!
//! - [`AccountStore`] - lookup and persistence for accounts
//! - [`ProfileStore`] - lookup and persistence for profiles

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod account;
pub mod error;
pub mod memory;
pub mod profile;

pub use account::AccountStore;
pub use error::{StorageError, StorageResult};
pub use memory::{InMemoryAccountStore, InMemoryProfileStore};
pub use profile::ProfileStore;
