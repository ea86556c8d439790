//! Federation provider configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`DirectoryUserProvider`](crate::DirectoryUserProvider).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Display name of the provider (used in logs).
    pub name: String,

    /// Locale code assigned to profiles created by this provider.
    ///
    /// The directory carries no locale attribute, so created profiles get
    /// this value (or none).
    pub default_locale: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "directory".to_string(),
            default_locale: None,
        }
    }
}

impl ProviderConfig {
    /// Creates a config with the given provider name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_locale: None,
        }
    }

    /// Sets the default locale for created profiles.
    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.name, "directory");
        assert!(config.default_locale.is_none());
    }

    #[test]
    fn config_builder() {
        let config = ProviderConfig::new("corp-ldap").with_default_locale("en_US");
        assert_eq!(config.name, "corp-ldap");
        assert_eq!(config.default_locale.as_deref(), Some("en_US"));
    }
}
