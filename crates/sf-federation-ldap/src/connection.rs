//! LDAP connection pool management.
//!
//! ## Security Requirements
//!
//! All connections use LDAPS (TLS from connection start). STARTTLS is NOT
//! supported to prevent downgrade attacks.

use std::sync::Arc;

use ldap3::{Ldap, LdapConnAsync, LdapConnSettings};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

use crate::config::LdapConfig;
use crate::error::{LdapError, LdapResult};

/// Pool of bound LDAPS connections.
///
/// A semaphore bounds concurrent checkouts; one idle bound connection is
/// kept for reuse and re-established lazily after it is lost.
pub struct LdapConnectionPool {
    config: Arc<LdapConfig>,
    semaphore: Arc<Semaphore>,
    idle: Arc<Mutex<Option<Ldap>>>,
}

impl LdapConnectionPool {
    /// Creates a pool for a validated configuration.
    #[must_use]
    pub fn new(config: LdapConfig) -> Self {
        let max_size = config.pool_max_size;
        Self {
            config: Arc::new(config),
            semaphore: Arc::new(Semaphore::new(max_size)),
            idle: Arc::new(Mutex::new(None)),
        }
    }

    /// Checks out a connection, binding a fresh one if none is idle.
    ///
    /// The returned handle puts the connection back into the idle slot on
    /// drop.
    pub async fn get(&self) -> LdapResult<LdapConnection> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| LdapError::PoolExhausted)?;

        let reused = self.idle.lock().await.take();
        let ldap = match reused {
            Some(ldap) => ldap,
            None => self.create_connection().await?,
        };

        Ok(LdapConnection {
            ldap,
            idle: self.idle.clone(),
            _permit: permit,
        })
    }

    /// Opens and binds a new LDAPS connection.
    async fn create_connection(&self) -> LdapResult<Ldap> {
        let settings = LdapConnSettings::new().set_conn_timeout(self.config.connection_timeout);

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.config.connection_url)
            .await
            .map_err(|e| LdapError::connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!("LDAP connection driver error: {}", e);
            }
        });

        ldap.simple_bind(&self.config.bind_dn, &self.config.bind_credential)
            .await
            .map_err(|e| LdapError::Bind(e.to_string()))?
            .success()
            .map_err(|e| LdapError::Bind(format!("Bind failed: {e:?}")))?;

        tracing::debug!(url = %self.config.connection_url, "bound new LDAPS connection");
        Ok(ldap)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &LdapConfig {
        &self.config
    }
}

/// A checked-out pool connection.
///
/// Dropping the handle returns the connection to the pool's idle slot.
pub struct LdapConnection {
    ldap: Ldap,
    idle: Arc<Mutex<Option<Ldap>>>,
    _permit: OwnedSemaphorePermit,
}

impl LdapConnection {
    /// Returns a mutable reference to the LDAP handle.
    #[must_use]
    pub fn ldap_mut(&mut self) -> &mut Ldap {
        &mut self.ldap
    }
}

impl Drop for LdapConnection {
    fn drop(&mut self) {
        // Best effort: if the slot is contended or occupied the handle is
        // simply dropped and a later checkout binds a fresh connection.
        if let Ok(mut slot) = self.idle.try_lock() {
            if slot.is_none() {
                *slot = Some(self.ldap.clone());
            }
        }
    }
}
