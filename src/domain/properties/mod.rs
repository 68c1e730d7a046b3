//! Properties domain - resolved bundles, override builders and sources

mod batcher;
mod command;
mod env;
mod source;
mod strategy;
mod worker_pool;

pub use batcher::{BatcherId, BatcherOverrides, BatcherProperties};
pub use command::{CommandId, CommandOverrides, CommandProperties};
pub use source::PropertySource;
pub use strategy::DefaultPropertiesStrategy;
pub use worker_pool::{WorkerPoolId, WorkerPoolOverrides, WorkerPoolProperties};
