use zksync_types::{Address, Eip712Transaction, U256};

use super::{Transaction712, TxParams};
use crate::error::ClientError;

/// Call of a contract or a plain transfer of the base token.
#[derive(Debug, Clone)]
pub struct TxFunctionCall {
    tx: Eip712Transaction,
}

impl TxFunctionCall {
    pub fn new(
        params: &TxParams,
        to: Address,
        value: U256,
        data: Vec<u8>,
    ) -> Result<Self, ClientError> {
        let tx = params.builder().to(to).value(value).data(data).build()?;
        Ok(Self { tx })
    }

    pub fn transfer(params: &TxParams, to: Address, value: U256) -> Result<Self, ClientError> {
        Self::new(params, to, value, Vec::new())
    }
}

impl Transaction712 for TxFunctionCall {
    fn tx(&self) -> &Eip712Transaction {
        &self.tx
    }
}
