use serde::Deserialize;
use zksync_types::{DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE, MAX_ENCODED_TX_SIZE, U256};

use super::envy_load;

/// Defaults applied to the transactions built by the SDK.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransactionConfig {
    /// Gas per pubdata byte limit put into every transaction.
    #[serde(default = "TransactionConfig::default_gas_per_pubdata_limit")]
    pub gas_per_pubdata_limit: u64,
    /// Priority fee used if the caller doesn't specify one. If not set, the priority fee
    /// equals the max fee per gas.
    #[serde(default)]
    pub default_max_priority_fee_per_gas: Option<u64>,
    /// Maximum size of a serialized transaction in bytes.
    #[serde(default = "TransactionConfig::default_max_encoded_tx_size")]
    pub max_encoded_tx_size: usize,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            gas_per_pubdata_limit: Self::default_gas_per_pubdata_limit(),
            default_max_priority_fee_per_gas: None,
            max_encoded_tx_size: Self::default_max_encoded_tx_size(),
        }
    }
}

impl TransactionConfig {
    const fn default_gas_per_pubdata_limit() -> u64 {
        DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE
    }

    const fn default_max_encoded_tx_size() -> usize {
        MAX_ENCODED_TX_SIZE
    }

    pub fn from_env() -> anyhow::Result<Self> {
        envy_load("transaction", "ZKSYNC_TX_")
    }

    pub fn gas_per_pubdata_limit(&self) -> U256 {
        self.gas_per_pubdata_limit.into()
    }

    pub fn default_max_priority_fee_per_gas(&self) -> Option<U256> {
        self.default_max_priority_fee_per_gas.map(U256::from)
    }
}
