use rlp::DecoderError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    bytecode::{validate_bytecode, InvalidBytecodeError},
    conversions::ConversionError,
    web3::Bytes,
    Address, H256, U256, U64,
};

/// Call contract request (eth_call / eth_estimateGas)
///
/// When using this for `eth_estimateGas`, all the fields
/// are optional. However, for usage in `eth_call` the
/// `to` field must be provided.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Sender address (None for arbitrary address)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// To address (None allowed for eth_estimateGas)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Supplied gas (None for sensible default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    /// Gas price (None for sensible default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    /// Transferred value (None for no transfer)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Data (None for empty data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Nonce
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<U64>,
    /// EIP712 meta
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eip712_meta: Option<Eip712Meta>,
}

impl CallRequest {
    /// Function to return a builder for a Call Request
    pub fn builder() -> CallRequestBuilder {
        CallRequestBuilder::default()
    }
}

/// Call Request Builder
#[derive(Clone, Debug, Default)]
pub struct CallRequestBuilder {
    call_request: CallRequest,
}

impl CallRequestBuilder {
    /// Set sender address (None for arbitrary address)
    pub fn from(mut self, from: Address) -> Self {
        self.call_request.from = Some(from);
        self
    }

    /// Set to address (None allowed for eth_estimateGas)
    pub fn to(mut self, to: Option<Address>) -> Self {
        self.call_request.to = to;
        self
    }

    /// Set supplied gas (None for sensible default)
    pub fn gas(mut self, gas: U256) -> Self {
        self.call_request.gas = Some(gas);
        self
    }

    pub fn gas_price(mut self, gas_price: U256) -> Self {
        self.call_request.gas_price = Some(gas_price);
        self
    }

    pub fn max_fee_per_gas(mut self, max_fee_per_gas: U256) -> Self {
        self.call_request.max_fee_per_gas = Some(max_fee_per_gas);
        self
    }

    pub fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: U256) -> Self {
        self.call_request.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
        self
    }

    /// Set transferred, value (None for no transfer)
    pub fn value(mut self, value: U256) -> Self {
        self.call_request.value = Some(value);
        self
    }

    /// Set data (None for empty data)
    pub fn data(mut self, data: Bytes) -> Self {
        self.call_request.data = Some(data);
        self
    }

    pub fn nonce(mut self, nonce: U256) -> Self {
        self.call_request.nonce = Some(nonce);
        self
    }

    pub fn transaction_type(mut self, transaction_type: U64) -> Self {
        self.call_request.transaction_type = Some(transaction_type);
        self
    }

    /// Set meta
    pub fn eip712_meta(mut self, eip712_meta: Eip712Meta) -> Self {
        self.call_request.eip712_meta = Some(eip712_meta);
        self
    }

    /// build the Call Request
    pub fn build(&self) -> CallRequest {
        self.call_request.clone()
    }
}

/// Discrepancy found when a transaction is re-hashed right before serialization.
#[derive(Debug, Error, PartialEq)]
pub enum EncodingMismatch {
    #[error("signing hash changed after signing: signed {signed:?}, now {actual:?}")]
    Hash { signed: H256, actual: H256 },
    #[error("signature recovers {recovered:?} instead of the sender {expected:?}")]
    Signer { expected: Address, recovered: Address },
}

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("transaction is incomplete: `{0}` is not set")]
    IncompleteTransaction(&'static str),
    #[error("transaction type {0:#04x} is not supported")]
    UnsupportedVariant(u8),
    #[error("invalid private key")]
    InvalidKey,
    #[error("encoded transaction does not match the signed one: {0}")]
    EncodingMismatch(#[from] EncodingMismatch),
    #[error("contract deployment event not found in the receipt logs")]
    AddressNotFound,
    #[error("decodeRlpError {0}")]
    Decode(#[from] DecoderError),
    #[error("invalid signature")]
    MalformedSignature,
    #[error("malformed paymaster params")]
    MalformedPaymasterParams,
    #[error("factory dependency #{0} is invalid: {1}")]
    InvalidFactoryDependency(usize, InvalidBytecodeError),
    /// Sanity checks to avoid extremely big numbers specified
    /// to gas and pubdata price.
    #[error("{0} higher than 2^64-1")]
    FeeTooBig(&'static str),
    #[error("gas per pub data limit is zero")]
    GasPerPubdataLimitZero,
    /// OversizedData is returned if the raw tx size is greater
    /// than some meaningful limit a user might use. This is not a consensus error
    /// making the transaction invalid, rather a DOS protection.
    #[error("oversized data. max: {0}; actual: {1}")]
    OversizedData(usize, usize),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Debug, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymasterParams {
    pub paymaster: Address,
    pub paymaster_input: Vec<u8>,
}

impl PaymasterParams {
    /// Parses the RLP-decoded `[paymaster, paymasterInput]` list; an empty list means no paymaster.
    pub(crate) fn from_vector(value: Vec<Vec<u8>>) -> Result<Option<Self>, TransactionError> {
        if value.is_empty() {
            return Ok(None);
        }
        if value.len() != 2 || value[0].len() != 20 {
            return Err(TransactionError::MalformedPaymasterParams);
        }

        let result = Some(Self {
            paymaster: Address::from_slice(&value[0]),
            paymaster_input: value[1].clone(),
        });

        Ok(result)
    }
}

#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Meta {
    pub gas_per_pubdata: U256,
    #[serde(default)]
    pub factory_deps: Vec<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_signature: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_params: Option<PaymasterParams>,
}

pub fn validate_factory_deps(factory_deps: &[Vec<u8>]) -> Result<(), TransactionError> {
    for (i, dep) in factory_deps.iter().enumerate() {
        validate_bytecode(dep).map_err(|err| TransactionError::InvalidFactoryDependency(i, err))?;
    }

    Ok(())
}
