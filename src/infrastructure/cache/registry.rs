//! Properties registry - named cache instantiations over a default strategy

use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::properties::{
    BatcherId, BatcherOverrides, BatcherProperties, CommandId, CommandOverrides,
    CommandProperties, DefaultPropertiesStrategy, PropertySource, WorkerPoolId,
    WorkerPoolOverrides, WorkerPoolProperties,
};

use super::property_cache::PropertyCache;

/// Source trait object for command properties
pub type CommandSource = dyn PropertySource<CommandId, CommandOverrides, CommandProperties>;
/// Source trait object for worker pool properties
pub type WorkerPoolSource =
    dyn PropertySource<WorkerPoolId, WorkerPoolOverrides, WorkerPoolProperties>;
/// Source trait object for batcher properties
pub type BatcherSource = dyn PropertySource<BatcherId, BatcherOverrides, BatcherProperties>;

/// Owns one property cache per bundle kind plus the default source
/// substituted when a call supplies none
///
/// Construct one registry at the composition root and hand it down; separate
/// registries hold fully independent caches, which keeps tests isolated and
/// allows several independent configurations in one process. The three kinds
/// share the engine but never a key space.
pub struct PropertiesRegistry {
    commands: PropertyCache<CommandId, CommandOverrides, CommandProperties>,
    worker_pools: PropertyCache<WorkerPoolId, WorkerPoolOverrides, WorkerPoolProperties>,
    batchers: PropertyCache<BatcherId, BatcherOverrides, BatcherProperties>,
    default_command_source: Arc<CommandSource>,
    default_worker_pool_source: Arc<WorkerPoolSource>,
    default_batcher_source: Arc<BatcherSource>,
}

impl PropertiesRegistry {
    /// Registry backed by the default strategy with environment-resolved
    /// baselines
    pub fn new() -> Self {
        Self::with_strategy(Arc::new(DefaultPropertiesStrategy::from_env()))
    }

    /// Registry using `strategy` as the default source for every kind
    pub fn with_strategy<S>(strategy: Arc<S>) -> Self
    where
        S: PropertySource<CommandId, CommandOverrides, CommandProperties>
            + PropertySource<WorkerPoolId, WorkerPoolOverrides, WorkerPoolProperties>
            + PropertySource<BatcherId, BatcherOverrides, BatcherProperties>
            + 'static,
    {
        let default_command_source: Arc<CommandSource> = strategy.clone();
        let default_worker_pool_source: Arc<WorkerPoolSource> = strategy.clone();
        let default_batcher_source: Arc<BatcherSource> = strategy;

        Self {
            commands: PropertyCache::new(),
            worker_pools: PropertyCache::new(),
            batchers: PropertyCache::new(),
            default_command_source,
            default_worker_pool_source,
            default_batcher_source,
        }
    }

    /// Canonical command properties for `id`
    ///
    /// `strategy: None` substitutes the registry default. Concurrent callers
    /// for the same cache key converge on one shared instance.
    pub fn command_properties(
        &self,
        strategy: Option<&CommandSource>,
        id: &CommandId,
        overrides: Option<CommandOverrides>,
    ) -> Result<Arc<CommandProperties>, DomainError> {
        let source = strategy.unwrap_or(self.default_command_source.as_ref());
        self.commands.get_or_create(source, id, overrides)
    }

    /// Canonical worker pool properties for `id`
    pub fn worker_pool_properties(
        &self,
        strategy: Option<&WorkerPoolSource>,
        id: &WorkerPoolId,
        overrides: Option<WorkerPoolOverrides>,
    ) -> Result<Arc<WorkerPoolProperties>, DomainError> {
        let source = strategy.unwrap_or(self.default_worker_pool_source.as_ref());
        self.worker_pools.get_or_create(source, id, overrides)
    }

    /// Canonical batcher properties for `id`
    pub fn batcher_properties(
        &self,
        strategy: Option<&BatcherSource>,
        id: &BatcherId,
        overrides: Option<BatcherOverrides>,
    ) -> Result<Arc<BatcherProperties>, DomainError> {
        let source = strategy.unwrap_or(self.default_batcher_source.as_ref());
        self.batchers.get_or_create(source, id, overrides)
    }
}

impl Default for PropertiesRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PropertiesRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertiesRegistry")
            .field("commands", &self.commands)
            .field("worker_pools", &self.worker_pools)
            .field("batchers", &self.batchers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn registry() -> PropertiesRegistry {
        PropertiesRegistry::with_strategy(Arc::new(DefaultPropertiesStrategy::with_baselines(
            CommandProperties::default(),
            WorkerPoolProperties::default(),
            BatcherProperties::default(),
        )))
    }

    #[test]
    fn test_default_strategy_substitution() {
        let registry = registry();
        let id = CommandId::new("checkout").unwrap();

        let props = registry.command_properties(None, &id, None).unwrap();

        assert_eq!(*props, CommandProperties::default());
        assert_eq!(registry.commands.len(), 1);
    }

    #[test]
    fn test_kinds_have_independent_key_spaces() {
        let registry = registry();

        registry
            .command_properties(None, &CommandId::new("shared-name").unwrap(), None)
            .unwrap();
        registry
            .worker_pool_properties(None, &WorkerPoolId::new("shared-name").unwrap(), None)
            .unwrap();
        registry
            .batcher_properties(None, &BatcherId::new("shared-name").unwrap(), None)
            .unwrap();

        assert_eq!(registry.commands.len(), 1);
        assert_eq!(registry.worker_pools.len(), 1);
        assert_eq!(registry.batchers.len(), 1);
    }

    #[test]
    fn test_first_caller_overrides_win() {
        let registry = registry();
        let id = CommandId::new("checkout").unwrap();

        let first = registry
            .command_properties(
                None,
                &id,
                Some(CommandOverrides::new().with_execution_timeout(Duration::from_millis(250))),
            )
            .unwrap();
        let second = registry
            .command_properties(
                None,
                &id,
                Some(CommandOverrides::new().with_execution_timeout(Duration::from_millis(999))),
            )
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.execution_timeout_ms, 250);
    }

    #[test]
    fn test_registries_are_isolated() {
        let left = registry();
        let right = registry();
        let id = WorkerPoolId::new("db-pool").unwrap();

        let from_left = left.worker_pool_properties(None, &id, None).unwrap();
        let from_right = right.worker_pool_properties(None, &id, None).unwrap();

        assert!(!Arc::ptr_eq(&from_left, &from_right));
        assert_eq!(left.worker_pools.len(), 1);
        assert_eq!(right.worker_pools.len(), 1);
    }

    #[test]
    fn test_per_call_strategy_overrides_default() {
        /// Never caches and pads the batch size
        #[derive(Debug)]
        struct UncachedBatcherSource;

        impl PropertySource<BatcherId, BatcherOverrides, BatcherProperties> for UncachedBatcherSource {
            fn cache_key(
                &self,
                _id: &BatcherId,
                _overrides: Option<&BatcherOverrides>,
            ) -> Option<String> {
                None
            }

            fn default_overrides(&self) -> BatcherOverrides {
                BatcherOverrides::new().with_max_batch_size(5)
            }

            fn build(
                &self,
                _id: &BatcherId,
                overrides: &BatcherOverrides,
            ) -> Result<BatcherProperties, DomainError> {
                BatcherProperties::default().resolve(overrides)
            }
        }

        let registry = registry();
        let id = BatcherId::new("notifications").unwrap();

        let props = registry
            .batcher_properties(Some(&UncachedBatcherSource), &id, None)
            .unwrap();

        assert_eq!(props.max_batch_size, 5);
        assert!(registry.batchers.is_empty());
    }

    #[test]
    fn test_custom_default_strategy_baselines() {
        let mut batcher_baseline = BatcherProperties::default();
        batcher_baseline.window_ms = 75;
        let registry = PropertiesRegistry::with_strategy(Arc::new(
            DefaultPropertiesStrategy::with_baselines(
                CommandProperties::default(),
                WorkerPoolProperties::default(),
                batcher_baseline,
            ),
        ));

        let props = registry
            .batcher_properties(None, &BatcherId::new("notifications").unwrap(), None)
            .unwrap();

        assert_eq!(props.window(), Duration::from_millis(75));
    }
}
