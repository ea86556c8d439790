//! # sf-federation-ldap
//!
//! LDAP backend for directory user federation.
//!
//! Implements [`DirectoryIdentitySource`](sf_federation::DirectoryIdentitySource)
//! and [`AttributeFetcher`](sf_federation::AttributeFetcher) over an LDAP
//! directory via the `ldap3` crate.
//!
//! ## Security Requirements
//!
//! Only LDAPS (TLS from connection start) is supported. Plain `ldap://`
//! and STARTTLS are rejected at configuration time.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod connection;
pub mod error;
pub mod search;
pub mod source;

pub use config::{AttributeMap, LdapConfig, SearchScope};
pub use connection::LdapConnectionPool;
pub use error::{LdapError, LdapResult};
pub use search::LdapEntry;
pub use source::LdapDirectory;
