//! Infrastructure layer - cache engine and registry implementations

pub mod cache;
