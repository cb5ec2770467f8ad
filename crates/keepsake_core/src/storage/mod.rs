//! Storage provider selection.
//!
//! # Responsibility
//! - Register the available `LifeStore` providers.
//! - Select the one named by configuration at startup.

mod registry;

pub use registry::{StoreRegistry, StoreRegistryError};

use crate::config::EngineConfig;
use crate::repo::{InMemoryLifeStore, RepoError, SqliteLifeStore};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Startup failure while opening or selecting a provider.
#[derive(Debug)]
pub enum BootstrapError {
    Registry(StoreRegistryError),
    Open(RepoError),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::Open(err) => write!(f, "failed to open storage: {err}"),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Open(err) => Some(err),
        }
    }
}

impl From<StoreRegistryError> for BootstrapError {
    fn from(value: StoreRegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<RepoError> for BootstrapError {
    fn from(value: RepoError) -> Self {
        Self::Open(value)
    }
}

/// Builds a registry holding the in-memory provider, plus the SQLite
/// provider when `database_path` is set, and selects the configured one.
///
/// The SQLite database is opened (and migrated) only when a path is given.
pub fn bootstrap_store_registry(config: &EngineConfig) -> Result<StoreRegistry, BootstrapError> {
    let mut registry = StoreRegistry::new();
    registry.register(Arc::new(InMemoryLifeStore::new()))?;
    if let Some(path) = &config.database_path {
        registry.register(Arc::new(SqliteLifeStore::open(path)?))?;
    }
    registry.select_active(&config.storage_provider)?;
    Ok(registry)
}
