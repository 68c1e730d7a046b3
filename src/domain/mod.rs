//! Domain layer - property bundles, identities and the source boundary

pub mod error;
pub mod properties;

pub use error::DomainError;
pub use properties::{
    BatcherId, BatcherOverrides, BatcherProperties, CommandId, CommandOverrides,
    CommandProperties, DefaultPropertiesStrategy, PropertySource, WorkerPoolId,
    WorkerPoolOverrides, WorkerPoolProperties,
};
