//! # sf-model
//!
//! Domain models for the storefront user store.
//!
//! This crate defines the two entities the directory federation layer
//! reconciles: [`Profile`] (person-level data, keyed by email) and
//! [`Account`] (the authenticatable record, keyed by username).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod account;
pub mod profile;

pub use account::{Account, DIRECTORY_PASSWORD_PLACEHOLDER};
pub use profile::Profile;

/// Canonicalizes a username or email for uniqueness comparisons.
///
/// Lowercases and trims surrounding whitespace. Used when the directory
/// does not supply an explicit canonical form.
#[must_use]
pub fn canonicalize(value: &str) -> String {
    value.trim().to_lowercase()
}
