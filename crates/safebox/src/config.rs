//! Ledger configuration.

use std::path::PathBuf;

use safebox_registry::{RegistryConfig, DEFAULT_MAX_MEMBERS};
use safebox_store::{MemoryStore, SqliteStore, Store};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which storage backend the ledger runs on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Volatile in-memory state.
    #[default]
    Memory,
    /// Durable SQLite database at `path`.
    Sqlite { path: PathBuf },
}

/// Configuration for a ledger.
///
/// Every field has a default, so `{}` is a valid configuration.
///
/// ```json
/// { "max_group_members": 16, "store": { "backend": "sqlite", "path": "registry.db" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Largest member list accepted by `create-sharing-group`.
    pub max_group_members: usize,
    pub store: StoreConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_group_members: DEFAULT_MAX_MEMBERS,
            store: StoreConfig::default(),
        }
    }
}

impl LedgerConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// A configuration using SQLite at `path`.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreConfig::Sqlite { path: path.into() },
            ..Self::default()
        }
    }

    /// The registry tunables.
    pub fn registry(&self) -> RegistryConfig {
        RegistryConfig {
            max_group_members: self.max_group_members,
        }
    }

    /// Open the configured storage backend.
    pub fn open_store(&self) -> Result<Box<dyn Store>> {
        let store: Box<dyn Store> = match &self.store {
            StoreConfig::Memory => Box::new(MemoryStore::new()),
            StoreConfig::Sqlite { path } => Box::new(SqliteStore::open(path)?),
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = LedgerConfig::from_json("{}").unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.max_group_members, 32);
        assert_eq!(config.store, StoreConfig::Memory);
    }

    #[test]
    fn test_sqlite_backend_from_json() {
        let config = LedgerConfig::from_json(
            r#"{ "max_group_members": 4, "store": { "backend": "sqlite", "path": "/tmp/r.db" } }"#,
        )
        .unwrap();

        assert_eq!(config.registry().max_group_members, 4);
        assert_eq!(
            config.store,
            StoreConfig::Sqlite {
                path: PathBuf::from("/tmp/r.db")
            }
        );
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(
            LedgerConfig::from_json("{ \"max_group_members\": \"many\" }"),
            Err(crate::LedgerError::Config(_))
        ));
    }
}
