//! Batcher properties - request batching configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env;
use crate::domain::error::DomainError;

/// Batcher identifier - the logical name of a request batcher
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BatcherId(String);

impl BatcherId {
    /// Create a new BatcherId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::invalid_id("batcher id must not be empty"));
        }
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BatcherId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BatcherId> for String {
    fn from(id: BatcherId) -> Self {
        id.0
    }
}

impl std::fmt::Display for BatcherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolved batcher properties
///
/// Immutable once published through a property cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatcherProperties {
    /// Requests collected into one batch before it is dispatched early
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: u32,
    /// How long requests are collected before the batch fires, in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Whether identical requests within a batch share one response
    #[serde(default = "default_true")]
    pub request_cache_enabled: bool,
}

fn default_max_batch_size() -> u32 {
    100
}

fn default_window_ms() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for BatcherProperties {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            window_ms: default_window_ms(),
            request_cache_enabled: default_true(),
        }
    }
}

impl BatcherProperties {
    /// Built-in defaults with environment overrides applied
    ///
    /// Recognized variables: `RESILIENCE_BATCHER_MAX_BATCH_SIZE`,
    /// `RESILIENCE_BATCHER_WINDOW_MS`,
    /// `RESILIENCE_BATCHER_REQUEST_CACHE_ENABLED`.
    pub fn from_env() -> Self {
        let mut props = Self::default();

        if let Some(v) = env::parse("RESILIENCE_BATCHER_MAX_BATCH_SIZE") {
            props.max_batch_size = v;
        }
        if let Some(v) = env::parse("RESILIENCE_BATCHER_WINDOW_MS") {
            props.window_ms = v;
        }
        if let Some(v) = env::parse("RESILIENCE_BATCHER_REQUEST_CACHE_ENABLED") {
            props.request_cache_enabled = v;
        }

        props
    }

    /// Applies an override builder on top of these properties and validates
    /// the merged result
    pub fn resolve(&self, overrides: &BatcherOverrides) -> Result<Self, DomainError> {
        let resolved = Self {
            max_batch_size: overrides.max_batch_size.unwrap_or(self.max_batch_size),
            window_ms: overrides.window_ms.unwrap_or(self.window_ms),
            request_cache_enabled: overrides
                .request_cache_enabled
                .unwrap_or(self.request_cache_enabled),
        };
        resolved.validate()?;
        Ok(resolved)
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.max_batch_size == 0 {
            return Err(DomainError::validation("max batch size must be positive"));
        }
        if self.window_ms == 0 {
            return Err(DomainError::validation("batching window must be positive"));
        }
        Ok(())
    }
}

/// Per-call batcher property overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatcherOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_batch_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_cache_enabled: Option<bool>,
}

impl BatcherOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_batch_size(mut self, size: u32) -> Self {
        self.max_batch_size = Some(size);
        self
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window_ms = Some(window.as_millis() as u64);
        self
    }

    pub fn with_request_cache_enabled(mut self, enabled: bool) -> Self {
        self.request_cache_enabled = Some(enabled);
        self
    }
}
