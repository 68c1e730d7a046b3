//! Command properties - execution and circuit breaker configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env;
use crate::domain::error::DomainError;

/// Command identifier - the logical name of a protected operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommandId(String);

impl CommandId {
    /// Create a new CommandId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::invalid_id("command id must not be empty"));
        }
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommandId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CommandId> for String {
    fn from(id: CommandId) -> Self {
        id.0
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolved command properties
///
/// Immutable once published through a property cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandProperties {
    /// Time budget for a single execution, in milliseconds
    #[serde(default = "default_execution_timeout_ms")]
    pub execution_timeout_ms: u64,
    /// Maximum executions allowed in flight at once
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: u32,
    /// Whether the circuit breaker participates at all
    #[serde(default = "default_true")]
    pub circuit_breaker_enabled: bool,
    /// Minimum requests in the rolling window before the breaker may trip
    #[serde(default = "default_request_volume_threshold")]
    pub circuit_breaker_request_volume_threshold: u32,
    /// Error percentage (0 - 100) at or above which the breaker opens
    #[serde(default = "default_error_threshold_percentage")]
    pub circuit_breaker_error_threshold_percentage: u8,
    /// How long an open breaker rejects before allowing a probe, in milliseconds
    #[serde(default = "default_sleep_window_ms")]
    pub circuit_breaker_sleep_window_ms: u64,
}

fn default_execution_timeout_ms() -> u64 {
    1_000
}

fn default_max_concurrent_requests() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

fn default_request_volume_threshold() -> u32 {
    20
}

fn default_error_threshold_percentage() -> u8 {
    50
}

fn default_sleep_window_ms() -> u64 {
    5_000
}

impl Default for CommandProperties {
    fn default() -> Self {
        Self {
            execution_timeout_ms: default_execution_timeout_ms(),
            max_concurrent_requests: default_max_concurrent_requests(),
            circuit_breaker_enabled: default_true(),
            circuit_breaker_request_volume_threshold: default_request_volume_threshold(),
            circuit_breaker_error_threshold_percentage: default_error_threshold_percentage(),
            circuit_breaker_sleep_window_ms: default_sleep_window_ms(),
        }
    }
}

impl CommandProperties {
    /// Built-in defaults with environment overrides applied
    ///
    /// Recognized variables: `RESILIENCE_COMMAND_EXECUTION_TIMEOUT_MS`,
    /// `RESILIENCE_COMMAND_MAX_CONCURRENT_REQUESTS`,
    /// `RESILIENCE_COMMAND_CIRCUIT_BREAKER_ENABLED`,
    /// `RESILIENCE_COMMAND_REQUEST_VOLUME_THRESHOLD`,
    /// `RESILIENCE_COMMAND_ERROR_THRESHOLD_PERCENTAGE`,
    /// `RESILIENCE_COMMAND_SLEEP_WINDOW_MS`.
    pub fn from_env() -> Self {
        let mut props = Self::default();

        if let Some(v) = env::parse("RESILIENCE_COMMAND_EXECUTION_TIMEOUT_MS") {
            props.execution_timeout_ms = v;
        }
        if let Some(v) = env::parse("RESILIENCE_COMMAND_MAX_CONCURRENT_REQUESTS") {
            props.max_concurrent_requests = v;
        }
        if let Some(v) = env::parse("RESILIENCE_COMMAND_CIRCUIT_BREAKER_ENABLED") {
            props.circuit_breaker_enabled = v;
        }
        if let Some(v) = env::parse("RESILIENCE_COMMAND_REQUEST_VOLUME_THRESHOLD") {
            props.circuit_breaker_request_volume_threshold = v;
        }
        if let Some(v) = env::parse("RESILIENCE_COMMAND_ERROR_THRESHOLD_PERCENTAGE") {
            props.circuit_breaker_error_threshold_percentage = v;
        }
        if let Some(v) = env::parse("RESILIENCE_COMMAND_SLEEP_WINDOW_MS") {
            props.circuit_breaker_sleep_window_ms = v;
        }

        props
    }

    /// Applies an override builder on top of these properties and validates
    /// the merged result
    pub fn resolve(&self, overrides: &CommandOverrides) -> Result<Self, DomainError> {
        let resolved = Self {
            execution_timeout_ms: overrides
                .execution_timeout_ms
                .unwrap_or(self.execution_timeout_ms),
            max_concurrent_requests: overrides
                .max_concurrent_requests
                .unwrap_or(self.max_concurrent_requests),
            circuit_breaker_enabled: overrides
                .circuit_breaker_enabled
                .unwrap_or(self.circuit_breaker_enabled),
            circuit_breaker_request_volume_threshold: overrides
                .circuit_breaker_request_volume_threshold
                .unwrap_or(self.circuit_breaker_request_volume_threshold),
            circuit_breaker_error_threshold_percentage: overrides
                .circuit_breaker_error_threshold_percentage
                .unwrap_or(self.circuit_breaker_error_threshold_percentage),
            circuit_breaker_sleep_window_ms: overrides
                .circuit_breaker_sleep_window_ms
                .unwrap_or(self.circuit_breaker_sleep_window_ms),
        };
        resolved.validate()?;
        Ok(resolved)
    }

    pub fn execution_timeout(&self) -> Duration {
        Duration::from_millis(self.execution_timeout_ms)
    }

    pub fn circuit_breaker_sleep_window(&self) -> Duration {
        Duration::from_millis(self.circuit_breaker_sleep_window_ms)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.execution_timeout_ms == 0 {
            return Err(DomainError::validation(
                "execution timeout must be positive",
            ));
        }
        if self.circuit_breaker_error_threshold_percentage > 100 {
            return Err(DomainError::validation(format!(
                "error threshold percentage must be 0 - 100, got {}",
                self.circuit_breaker_error_threshold_percentage
            )));
        }
        Ok(())
    }
}

/// Per-call command property overrides
///
/// Unset fields fall through to the baseline the source resolves against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_timeout_ms: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_requests: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_breaker_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_breaker_request_volume_threshold: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_breaker_error_threshold_percentage: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_breaker_sleep_window_ms: Option<u64>,
}

impl CommandOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_max_concurrent_requests(mut self, max: u32) -> Self {
        self.max_concurrent_requests = Some(max);
        self
    }

    pub fn with_circuit_breaker_enabled(mut self, enabled: bool) -> Self {
        self.circuit_breaker_enabled = Some(enabled);
        self
    }

    pub fn with_request_volume_threshold(mut self, threshold: u32) -> Self {
        self.circuit_breaker_request_volume_threshold = Some(threshold);
        self
    }

    pub fn with_error_threshold_percentage(mut self, percentage: u8) -> Self {
        self.circuit_breaker_error_threshold_percentage = Some(percentage);
        self
    }

    pub fn with_sleep_window(mut self, window: Duration) -> Self {
        self.circuit_breaker_sleep_window_ms = Some(window.as_millis() as u64);
        self
    }
}
