//! Constructors of transactions for the typical account operations.
//!
//! Each constructor produces a draft with the gas limit that is not necessarily known. The draft
//! is converted to a [`CallRequest`] to estimate gas, and then to a [`ReadyTransaction`] with
//! [`Transaction712::tx712()`].

use zksync_config::TransactionConfig;
use zksync_types::{
    Address, CallRequest, Eip712Transaction, L2ChainId, Nonce, PaymasterParams, ReadyTransaction,
    TransactionBuilder, U256,
};

pub use self::{
    deploy_contract::{TxCreate2Contract, TxCreateContract},
    function_call::TxFunctionCall,
};
use crate::error::ClientError;

mod deploy_contract;
mod function_call;

/// Parameters shared by all transactions sent from an account.
#[derive(Debug, Clone)]
pub struct TxParams {
    chain_id: L2ChainId,
    nonce: Nonce,
    from: Address,
    gas_price: U256,
    gas_limit: u64,
    max_priority_fee_per_gas: Option<U256>,
    paymaster_params: Option<PaymasterParams>,
    config: TransactionConfig,
}

impl TxParams {
    pub fn new(chain_id: L2ChainId, nonce: Nonce, from: Address, gas_price: U256) -> Self {
        Self {
            chain_id,
            nonce,
            from,
            gas_price,
            gas_limit: 0,
            max_priority_fee_per_gas: None,
            paymaster_params: None,
            config: TransactionConfig::default(),
        }
    }

    /// Sets the gas limit if it is known in advance; by default, it is left for estimation.
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn max_priority_fee_per_gas(mut self, fee: U256) -> Self {
        self.max_priority_fee_per_gas = Some(fee);
        self
    }

    pub fn paymaster_params(mut self, params: PaymasterParams) -> Self {
        self.paymaster_params = Some(params);
        self
    }

    pub fn with_config(mut self, config: TransactionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn from(&self) -> Address {
        self.from
    }

    pub(crate) fn builder(&self) -> TransactionBuilder {
        let mut builder = TransactionBuilder::new()
            .chain_id(self.chain_id)
            .nonce(self.nonce)
            .from(self.from)
            .gas_price(self.gas_price)
            .gas_limit(self.gas_limit)
            .gas_per_pubdata_limit(self.config.gas_per_pubdata_limit())
            .max_encoded_size(self.config.max_encoded_tx_size);
        let priority_fee = self
            .max_priority_fee_per_gas
            .or_else(|| self.config.default_max_priority_fee_per_gas());
        if let Some(fee) = priority_fee {
            builder = builder.max_priority_fee_per_gas(fee);
        }
        if let Some(params) = &self.paymaster_params {
            builder = builder.paymaster_params(params.clone());
        }
        builder
    }
}

/// Transaction draft produced by one of the constructors in this module.
pub trait Transaction712 {
    fn tx(&self) -> &Eip712Transaction;

    /// Returns the request for `eth_estimateGas`.
    fn estimation_request(&self) -> CallRequest {
        CallRequest::from(self.tx())
    }

    /// Fixes the estimated gas limit, making the transaction ready for signing.
    fn tx712(&self, estimated_gas: u64) -> Result<ReadyTransaction, ClientError> {
        Ok(self.tx().clone().into_ready(estimated_gas)?)
    }
}

#[cfg(test)]
mod tests;
