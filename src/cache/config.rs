//! Cache-control configuration.
//!
//! Configuration can be built in code or loaded from JSON:
//!
//! ```json
//! {
//!   "use_expires_header": true,
//!   "handlers": [
//!     { "type": "Catalog", "directive": { "policy": ["private"] } },
//!     { "type": "Catalog", "method": "list",
//!       "directive": { "policy": ["public"], "max_age": 360 } }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::CacheDirective;

/// Errors produced while loading a [`CacheControlConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid cache-control config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("handler entry {index} has an empty type name")]
    EmptyTypeName { index: usize },

    #[error("handler entry {index} ({type_name}) has an empty method name")]
    EmptyMethodName { index: usize, type_name: String },
}

/// One declared directive, scoped to a type or to a single method of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerEntry {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub directive: CacheDirective,
}

/// Settings for the cache-control layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheControlConfig {
    /// Emit `Expires` alongside `max-age`. Defaults to `true`.
    pub use_expires_header: bool,
    /// Declared directives, applied in order.
    pub handlers: Vec<HandlerEntry>,
}

impl Default for CacheControlConfig {
    fn default() -> Self {
        Self {
            use_expires_header: true,
            handlers: Vec::new(),
        }
    }
}

impl CacheControlConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn use_expires_header(mut self, enabled: bool) -> Self {
        self.use_expires_header = enabled;
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            handlers = config.handlers.len(),
            use_expires_header = config.use_expires_header,
            "loaded cache-control config"
        );
        Ok(config)
    }

    /// Check that every handler entry names a type and, if scoped to a method, a method.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, entry) in self.handlers.iter().enumerate() {
            if entry.type_name.trim().is_empty() {
                return Err(ConfigError::EmptyTypeName { index });
            }
            if entry.method.as_deref().is_some_and(|m| m.trim().is_empty()) {
                return Err(ConfigError::EmptyMethodName {
                    index,
                    type_name: entry.type_name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePolicy;

    #[test]
    fn defaults_enable_expires() {
        let config = CacheControlConfig::default();
        assert!(config.use_expires_header);
        assert!(config.handlers.is_empty());
        assert_eq!(CacheControlConfig::from_json("{}").unwrap(), config);
    }

    #[test]
    fn builder_disables_expires() {
        assert!(!CacheControlConfig::new().use_expires_header(false).use_expires_header);
    }

    #[test]
    fn parses_handler_entries() {
        let config = CacheControlConfig::from_json(
            r#"{
                "use_expires_header": false,
                "handlers": [
                    {"type": "Catalog"},
                    {"type": "Catalog", "method": "list",
                     "directive": {"policy": ["public", "no-transform"], "max_age": 360}}
                ]
            }"#,
        )
        .unwrap();

        assert!(!config.use_expires_header);
        assert_eq!(config.handlers.len(), 2);
        assert_eq!(config.handlers[0].method, None);
        assert_eq!(config.handlers[0].directive, CacheDirective::default());
        let list = &config.handlers[1].directive;
        assert_eq!(
            list.policies(),
            &[CachePolicy::Public, CachePolicy::NoTransform]
        );
        assert_eq!(list.max_age_secs(), Some(360));
    }

    #[test]
    fn rejects_unknown_policy_token() {
        let err = CacheControlConfig::from_json(
            r#"{"handlers": [{"type": "Catalog", "directive": {"policy": ["immutable"]}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn rejects_empty_names() {
        let err = CacheControlConfig::from_json(r#"{"handlers": [{"type": " "}]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTypeName { index: 0 }));

        let err = CacheControlConfig::from_json(
            r#"{"handlers": [{"type": "Catalog"}, {"type": "Catalog", "method": ""}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyMethodName { index: 1, .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CacheControlConfig::from_file("/nonexistent/cachectl.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn serializes_back_to_tokens() {
        let config = CacheControlConfig::from_json(
            r#"{"handlers": [{"type": "Catalog", "directive": {"policy": ["must-revalidate"]}}]}"#,
        )
        .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"must-revalidate\""));
        assert_eq!(CacheControlConfig::from_json(&json).unwrap(), config);
    }
}
