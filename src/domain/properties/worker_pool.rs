//! Worker pool properties - sizing and queueing configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env;
use crate::domain::error::DomainError;

/// Worker pool identifier - the logical name of an execution pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkerPoolId(String);

impl WorkerPoolId {
    /// Create a new WorkerPoolId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::invalid_id("worker pool id must not be empty"));
        }
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkerPoolId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkerPoolId> for String {
    fn from(id: WorkerPoolId) -> Self {
        id.0
    }
}

impl std::fmt::Display for WorkerPoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolved worker pool properties
///
/// Immutable once published through a property cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPoolProperties {
    /// Workers kept alive even when idle
    #[serde(default = "default_core_size")]
    pub core_size: u32,
    /// Upper bound on workers under load
    #[serde(default = "default_max_size")]
    pub max_size: u32,
    /// Pending work accepted before submissions are rejected; 0 means direct
    /// hand-off with no queueing
    #[serde(default)]
    pub queue_capacity: u32,
    /// How long a surplus worker stays alive while idle, in milliseconds
    #[serde(default = "default_keep_alive_ms")]
    pub keep_alive_ms: u64,
}

fn default_core_size() -> u32 {
    10
}

fn default_max_size() -> u32 {
    10
}

fn default_keep_alive_ms() -> u64 {
    60_000
}

impl Default for WorkerPoolProperties {
    fn default() -> Self {
        Self {
            core_size: default_core_size(),
            max_size: default_max_size(),
            queue_capacity: 0,
            keep_alive_ms: default_keep_alive_ms(),
        }
    }
}

impl WorkerPoolProperties {
    /// Built-in defaults with environment overrides applied
    ///
    /// Recognized variables: `RESILIENCE_WORKER_POOL_CORE_SIZE`,
    /// `RESILIENCE_WORKER_POOL_MAX_SIZE`,
    /// `RESILIENCE_WORKER_POOL_QUEUE_CAPACITY`,
    /// `RESILIENCE_WORKER_POOL_KEEP_ALIVE_MS`.
    pub fn from_env() -> Self {
        let mut props = Self::default();

        if let Some(v) = env::parse("RESILIENCE_WORKER_POOL_CORE_SIZE") {
            props.core_size = v;
        }
        if let Some(v) = env::parse("RESILIENCE_WORKER_POOL_MAX_SIZE") {
            props.max_size = v;
        }
        if let Some(v) = env::parse("RESILIENCE_WORKER_POOL_QUEUE_CAPACITY") {
            props.queue_capacity = v;
        }
        if let Some(v) = env::parse("RESILIENCE_WORKER_POOL_KEEP_ALIVE_MS") {
            props.keep_alive_ms = v;
        }

        props
    }

    /// Applies an override builder on top of these properties and validates
    /// the merged result
    pub fn resolve(&self, overrides: &WorkerPoolOverrides) -> Result<Self, DomainError> {
        let resolved = Self {
            core_size: overrides.core_size.unwrap_or(self.core_size),
            max_size: overrides.max_size.unwrap_or(self.max_size),
            queue_capacity: overrides.queue_capacity.unwrap_or(self.queue_capacity),
            keep_alive_ms: overrides.keep_alive_ms.unwrap_or(self.keep_alive_ms),
        };
        resolved.validate()?;
        Ok(resolved)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_millis(self.keep_alive_ms)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.core_size == 0 {
            return Err(DomainError::validation("core size must be positive"));
        }
        if self.max_size < self.core_size {
            return Err(DomainError::validation(format!(
                "max size {} must be at least core size {}",
                self.max_size, self.core_size
            )));
        }
        Ok(())
    }
}

/// Per-call worker pool property overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPoolOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_capacity: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive_ms: Option<u64>,
}

impl WorkerPoolOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_core_size(mut self, size: u32) -> Self {
        self.core_size = Some(size);
        self
    }

    pub fn with_max_size(mut self, size: u32) -> Self {
        self.max_size = Some(size);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: u32) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive_ms = Some(keep_alive.as_millis() as u64);
        self
    }
}
