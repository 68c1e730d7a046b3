//! Cache infrastructure - get-or-create engine and named instantiations

mod property_cache;
mod registry;

pub use property_cache::PropertyCache;
pub use registry::{BatcherSource, CommandSource, PropertiesRegistry, WorkerPoolSource};
