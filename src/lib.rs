//! PMP Resilience Properties
//!
//! Canonical per-name configuration for resilience primitives:
//! - Commands (execution timeouts, circuit breaker thresholds)
//! - Worker pools (sizing and queueing)
//! - Request batchers (batch size and batching window)
//!
//! Concurrent callers asking for the properties of the same logical name
//! converge on a single shared instance per cache key. Resolution layers
//! built-in defaults, environment overrides and per-call override builders.

pub mod domain;
pub mod infrastructure;

pub use domain::error::DomainError;
pub use domain::properties::{
    BatcherId, BatcherOverrides, BatcherProperties, CommandId, CommandOverrides,
    CommandProperties, DefaultPropertiesStrategy, PropertySource, WorkerPoolId,
    WorkerPoolOverrides, WorkerPoolProperties,
};
pub use infrastructure::cache::{PropertiesRegistry, PropertyCache};
