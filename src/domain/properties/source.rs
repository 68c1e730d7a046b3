//! Property source boundary - cache key derivation and bundle construction

use crate::domain::error::DomainError;

/// Strategy boundary for one configuration-bundle kind
///
/// `K` is the logical identity, `O` the override builder and `B` the
/// resolved bundle. The identity is never used as a map key directly; the
/// source derives a string cache key from it, and a `None` key disables
/// caching for that call. One concrete strategy type typically implements
/// this trait once per bundle kind it serves.
pub trait PropertySource<K, O, B>: Send + Sync {
    /// Derives the cache key for this call, or `None` to bypass the cache
    fn cache_key(&self, id: &K, overrides: Option<&O>) -> Option<String>;

    /// Override builder substituted when the caller does not supply one
    fn default_overrides(&self) -> O;

    /// Builds the resolved bundle for `id` with `overrides` applied
    ///
    /// Failures propagate to the caller unmodified and nothing is cached.
    fn build(&self, id: &K, overrides: &O) -> Result<B, DomainError>;
}
