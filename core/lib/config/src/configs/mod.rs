use anyhow::Context as _;
use serde::de::DeserializeOwned;

pub use self::{observability::ObservabilityConfig, transaction::TransactionConfig};

pub mod observability;
pub mod transaction;

#[cfg(test)]
pub(crate) mod test_utils;

/// Loads the structure from the environment variables with the given prefix.
pub fn envy_load<T: DeserializeOwned>(name: &str, prefix: &str) -> anyhow::Result<T> {
    envy::prefixed(prefix)
        .from_env()
        .with_context(|| format!("Cannot load config <{name}>"))
}
