//! Environment override helpers

use std::str::FromStr;

use tracing::warn;

/// Reads and parses an environment variable, ignoring unset or unparsable
/// values so a bad override degrades to the built-in default.
pub(crate) fn parse<T: FromStr>(var: &str) -> Option<T> {
    let raw = std::env::var(var).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var, raw = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}
