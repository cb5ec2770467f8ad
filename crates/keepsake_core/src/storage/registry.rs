//! In-process storage provider registry and selection.

use crate::repo::LifeStore;
use log::info;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Provider registration/selection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRegistryError {
    InvalidProviderId(String),
    DuplicateProviderId(String),
    ProviderNotFound(String),
    ProviderNotSelected,
}

impl Display for StoreRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProviderId(value) => write!(f, "storage provider id is invalid: {value}"),
            Self::DuplicateProviderId(value) => {
                write!(f, "storage provider id already registered: {value}")
            }
            Self::ProviderNotFound(value) => write!(f, "storage provider not found: {value}"),
            Self::ProviderNotSelected => write!(f, "no active storage provider selected"),
        }
    }
}

impl Error for StoreRegistryError {}

/// Registry of interchangeable `LifeStore` providers.
#[derive(Default)]
pub struct StoreRegistry {
    providers: BTreeMap<String, Arc<dyn LifeStore>>,
    active_provider_id: Option<String>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one provider under its own `provider_id()`.
    pub fn register(&mut self, provider: Arc<dyn LifeStore>) -> Result<(), StoreRegistryError> {
        let provider_id = provider.provider_id().trim().to_string();
        if !is_valid_provider_id(&provider_id) {
            return Err(StoreRegistryError::InvalidProviderId(provider_id));
        }
        if self.providers.contains_key(provider_id.as_str()) {
            return Err(StoreRegistryError::DuplicateProviderId(provider_id));
        }

        info!("event=store_register module=storage status=ok provider={provider_id}");
        self.providers.insert(provider_id, provider);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Sorted provider ids.
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    /// Selects the active provider.
    pub fn select_active(&mut self, provider_id: &str) -> Result<(), StoreRegistryError> {
        let normalized = provider_id.trim();
        if !self.providers.contains_key(normalized) {
            return Err(StoreRegistryError::ProviderNotFound(normalized.to_string()));
        }
        self.active_provider_id = Some(normalized.to_string());
        info!("event=store_select module=storage status=ok provider={normalized}");
        Ok(())
    }

    pub fn clear_active(&mut self) {
        self.active_provider_id = None;
    }

    pub fn active_provider_id(&self) -> Option<&str> {
        self.active_provider_id.as_deref()
    }

    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn LifeStore>> {
        self.providers.get(provider_id.trim()).cloned()
    }

    /// Active provider handle, failing when none is selected.
    pub fn active(&self) -> Result<Arc<dyn LifeStore>, StoreRegistryError> {
        self.active_provider_id()
            .and_then(|id| self.get(id))
            .ok_or(StoreRegistryError::ProviderNotSelected)
    }
}

fn is_valid_provider_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::{StoreRegistry, StoreRegistryError};
    use crate::model::goal::{EntryId, GoalEntry, MemoryEntry};
    use crate::model::profile::BiographicalProfile;
    use crate::model::special_date::{CustomSpecialDate, SpecialDateId, SpecialDateStore};
    use crate::repo::{InMemoryLifeStore, LifeStore, RepoResult};
    use std::sync::Arc;

    struct NamedStore {
        id: &'static str,
        inner: InMemoryLifeStore,
    }

    impl NamedStore {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                inner: InMemoryLifeStore::new(),
            }
        }
    }

    impl LifeStore for NamedStore {
        fn provider_id(&self) -> &str {
            self.id
        }
        fn load_profile(&self, user_id: &str) -> RepoResult<Option<BiographicalProfile>> {
            self.inner.load_profile(user_id)
        }
        fn save_profile(&self, user_id: &str, profile: &BiographicalProfile) -> RepoResult<()> {
            self.inner.save_profile(user_id, profile)
        }
        fn load_custom_dates(&self, user_id: &str) -> RepoResult<SpecialDateStore> {
            self.inner.load_custom_dates(user_id)
        }
        fn save_custom_date(&self, user_id: &str, date: &CustomSpecialDate) -> RepoResult<()> {
            self.inner.save_custom_date(user_id, date)
        }
        fn delete_custom_date(&self, user_id: &str, id: SpecialDateId) -> RepoResult<()> {
            self.inner.delete_custom_date(user_id, id)
        }
        fn load_goals(&self, user_id: &str) -> RepoResult<Vec<GoalEntry>> {
            self.inner.load_goals(user_id)
        }
        fn load_goal(&self, user_id: &str, id: EntryId) -> RepoResult<Option<GoalEntry>> {
            self.inner.load_goal(user_id, id)
        }
        fn save_goal(&self, user_id: &str, goal: &GoalEntry) -> RepoResult<()> {
            self.inner.save_goal(user_id, goal)
        }
        fn delete_goal(&self, user_id: &str, id: EntryId) -> RepoResult<()> {
            self.inner.delete_goal(user_id, id)
        }
        fn convert_goal_to_memory(&self, user_id: &str, memory: &MemoryEntry) -> RepoResult<()> {
            self.inner.convert_goal_to_memory(user_id, memory)
        }
        fn load_memories(&self, user_id: &str) -> RepoResult<Vec<MemoryEntry>> {
            self.inner.load_memories(user_id)
        }
    }

    #[test]
    fn registers_and_selects_provider() {
        let mut registry = StoreRegistry::new();
        registry
            .register(Arc::new(InMemoryLifeStore::new()))
            .expect("provider should register");
        assert_eq!(registry.len(), 1);
        assert!(registry.active_provider_id().is_none());

        registry
            .select_active("  memory ")
            .expect("trimmed provider id should be selectable");
        assert_eq!(registry.active_provider_id(), Some("memory"));
        assert_eq!(
            registry.active().expect("active provider").provider_id(),
            "memory"
        );
    }

    #[test]
    fn rejects_invalid_or_duplicate_provider_id() {
        let mut registry = StoreRegistry::new();
        assert!(matches!(
            registry.register(Arc::new(NamedStore::new("Cloud Store"))),
            Err(StoreRegistryError::InvalidProviderId(_))
        ));
        assert!(matches!(
            registry.register(Arc::new(NamedStore::new("   "))),
            Err(StoreRegistryError::InvalidProviderId(_))
        ));

        registry
            .register(Arc::new(NamedStore::new("cloud-v2")))
            .expect("first provider should register");
        assert!(matches!(
            registry.register(Arc::new(NamedStore::new("cloud-v2"))),
            Err(StoreRegistryError::DuplicateProviderId(_))
        ));
        assert_eq!(registry.provider_ids(), vec!["cloud-v2".to_string()]);
    }

    #[test]
    fn active_fails_without_or_after_clearing_selection() {
        let mut registry = StoreRegistry::new();
        assert!(matches!(
            registry.active(),
            Err(StoreRegistryError::ProviderNotSelected)
        ));
        assert_eq!(
            registry.select_active("memory"),
            Err(StoreRegistryError::ProviderNotFound("memory".to_string()))
        );

        registry
            .register(Arc::new(InMemoryLifeStore::new()))
            .expect("provider should register");
        registry.select_active("memory").expect("select");
        registry.clear_active();
        assert!(registry.active().is_err());
    }
}
