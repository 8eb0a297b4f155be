#![allow(clippy::upper_case_acronyms, clippy::derive_partial_eq_without_eq)]

pub use crate::configs::{ObservabilityConfig, TransactionConfig};

pub mod configs;

#[cfg(feature = "observability_ext")]
mod observability_ext;
