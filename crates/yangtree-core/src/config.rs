//! Engine configuration
//!
//! Loaded from TOML by the tree assembler:
//!
//! ```toml
//! [logging]
//! profile = "production"
//! filter = "yangtree=warn"
//!
//! [lists]
//! ordered_by_default = true
//! ```
//!
//! Every section and key is optional.

use serde::Deserialize;

use crate::errors::{Result, YangError};
use crate::logging_facility::{init_with_filter, Profile};
use crate::tree::{ContainerSchema, ListSchema};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub logging: LoggingConfig,
    pub lists: ListConfig,
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub profile: Profile,
    /// Default filter directive used when `RUST_LOG` is unset
    pub filter: Option<String>,
}

/// `[lists]` section
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListConfig {
    pub ordered_by_default: bool,
}

impl CoreConfig {
    /// Parse configuration text
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML, unknown keys or bad values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| YangError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Filter directive in effect when `RUST_LOG` is unset
    pub fn filter(&self) -> &str {
        self.logging
            .filter
            .as_deref()
            .unwrap_or_else(|| self.logging.profile.default_filter())
    }

    /// Install the global subscriber for the configured profile
    pub fn init_logging(&self) {
        init_with_filter(self.logging.profile, self.filter());
    }

    /// List factory with the configured default ordering
    pub fn list_schema(&self, key_spec: &str, entry: ContainerSchema) -> ListSchema {
        ListSchema::new(key_spec, entry).ordered(self.lists.ordered_by_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_default() {
        let config = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.filter(), "yangtree=debug");
    }

    #[test]
    fn test_explicit_filter_overrides_profile() {
        let config = CoreConfig::from_toml_str(
            r#"
            [logging]
            profile = "production"
            filter = "yangtree=warn"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.profile, Profile::Production);
        assert_eq!(config.filter(), "yangtree=warn");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = CoreConfig::from_toml_str("[lists]\nsorted = true\n").unwrap_err();
        assert!(matches!(err, YangError::InvalidConfig { .. }));
    }
}
