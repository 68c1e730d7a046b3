//! Default property source - name-keyed caching over env-aware baselines

use super::batcher::{BatcherId, BatcherOverrides, BatcherProperties};
use super::command::{CommandId, CommandOverrides, CommandProperties};
use super::source::PropertySource;
use super::worker_pool::{WorkerPoolId, WorkerPoolOverrides, WorkerPoolProperties};
use crate::domain::error::DomainError;

/// Default source implementation for all three bundle kinds
///
/// The cache key is the identity name, so every caller asking for the same
/// name shares one canonical bundle; overrides do not participate in the key
/// and the first caller's overrides win. Bundles resolve per-call overrides
/// against baselines captured once at construction.
#[derive(Debug, Clone)]
pub struct DefaultPropertiesStrategy {
    command_baseline: CommandProperties,
    worker_pool_baseline: WorkerPoolProperties,
    batcher_baseline: BatcherProperties,
}

impl DefaultPropertiesStrategy {
    /// Baselines resolved from built-in defaults plus environment overrides
    pub fn from_env() -> Self {
        Self {
            command_baseline: CommandProperties::from_env(),
            worker_pool_baseline: WorkerPoolProperties::from_env(),
            batcher_baseline: BatcherProperties::from_env(),
        }
    }

    /// Explicit baselines, bypassing the environment
    pub fn with_baselines(
        command: CommandProperties,
        worker_pool: WorkerPoolProperties,
        batcher: BatcherProperties,
    ) -> Self {
        Self {
            command_baseline: command,
            worker_pool_baseline: worker_pool,
            batcher_baseline: batcher,
        }
    }
}

impl Default for DefaultPropertiesStrategy {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PropertySource<CommandId, CommandOverrides, CommandProperties> for DefaultPropertiesStrategy {
    fn cache_key(&self, id: &CommandId, _overrides: Option<&CommandOverrides>) -> Option<String> {
        Some(id.as_str().to_string())
    }

    fn default_overrides(&self) -> CommandOverrides {
        CommandOverrides::new()
    }

    fn build(
        &self,
        _id: &CommandId,
        overrides: &CommandOverrides,
    ) -> Result<CommandProperties, DomainError> {
        self.command_baseline.resolve(overrides)
    }
}

impl PropertySource<WorkerPoolId, WorkerPoolOverrides, WorkerPoolProperties>
    for DefaultPropertiesStrategy
{
    fn cache_key(
        &self,
        id: &WorkerPoolId,
        _overrides: Option<&WorkerPoolOverrides>,
    ) -> Option<String> {
        Some(id.as_str().to_string())
    }

    fn default_overrides(&self) -> WorkerPoolOverrides {
        WorkerPoolOverrides::new()
    }

    fn build(
        &self,
        _id: &WorkerPoolId,
        overrides: &WorkerPoolOverrides,
    ) -> Result<WorkerPoolProperties, DomainError> {
        self.worker_pool_baseline.resolve(overrides)
    }
}

impl PropertySource<BatcherId, BatcherOverrides, BatcherProperties> for DefaultPropertiesStrategy {
    fn cache_key(&self, id: &BatcherId, _overrides: Option<&BatcherOverrides>) -> Option<String> {
        Some(id.as_str().to_string())
    }

    fn default_overrides(&self) -> BatcherOverrides {
        BatcherOverrides::new()
    }

    fn build(
        &self,
        _id: &BatcherId,
        overrides: &BatcherOverrides,
    ) -> Result<BatcherProperties, DomainError> {
        self.batcher_baseline.resolve(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> DefaultPropertiesStrategy {
        DefaultPropertiesStrategy::with_baselines(
            CommandProperties::default(),
            WorkerPoolProperties::default(),
            BatcherProperties::default(),
        )
    }

    #[test]
    fn test_command_cache_key_is_identity_name() {
        let strategy = strategy();
        let id = CommandId::new("checkout").unwrap();
        let key = PropertySource::<CommandId, _, CommandProperties>::cache_key(&strategy, &id, None);
        assert_eq!(key, Some("checkout".to_string()));
    }

    #[test]
    fn test_cache_key_ignores_overrides() {
        let strategy = strategy();
        let id = CommandId::new("checkout").unwrap();
        let overrides = CommandOverrides::new().with_max_concurrent_requests(2);

        let bare =
            PropertySource::<CommandId, _, CommandProperties>::cache_key(&strategy, &id, None);
        let with_overrides = strategy.cache_key(&id, Some(&overrides));

        assert_eq!(bare, with_overrides);
    }

    #[test]
    fn test_build_resolves_against_baseline() {
        let mut baseline = CommandProperties::default();
        baseline.execution_timeout_ms = 3_000;
        let strategy = DefaultPropertiesStrategy::with_baselines(
            baseline,
            WorkerPoolProperties::default(),
            BatcherProperties::default(),
        );

        let id = CommandId::new("checkout").unwrap();
        let props = strategy
            .build(&id, &CommandOverrides::new().with_max_concurrent_requests(2))
            .unwrap();

        assert_eq!(props.execution_timeout_ms, 3_000);
        assert_eq!(props.max_concurrent_requests, 2);
    }

    #[test]
    fn test_build_surfaces_validation_failure() {
        let strategy = strategy();
        let id = WorkerPoolId::new("db-pool").unwrap();
        let overrides = WorkerPoolOverrides::new().with_core_size(8).with_max_size(1);

        assert!(strategy.build(&id, &overrides).is_err());
    }
}
