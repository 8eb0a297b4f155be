//! Lifecycle of a ZKsync EIP-712 transaction.
//!
//! A transaction goes through the following states, each represented by its own type:
//!
//! - [`TransactionBuilder`]: mutable set of fields, populated by the caller.
//! - [`Eip712Transaction`]: validated draft. The gas limit may still be `0`, meaning that it
//!   is not yet estimated.
//! - [`ReadyTransaction`]: immutable transaction with known gas limit; it can be hashed and signed.
//! - [`SignedTransaction`]: ready transaction with an attached signature; it can be serialized.

use std::ops::Deref;

use tracing::debug;

use self::layout::{FieldValue, TxFieldLayout};
use crate::{
    bytecode::BytecodeHash,
    conversions::address_to_u256,
    transaction_request::{validate_factory_deps, EncodingMismatch, TransactionError},
    web3::{keccak256, keccak256_concat, Bytes},
    Address, CallRequest, EIP712TypedStructure, Eip712Domain, Eip712Meta, L2ChainId, Nonce,
    PackedEthSignature, PaymasterParams, StructBuilder, CONTRACT_DEPLOYER_ADDRESS,
    DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE, EIP_712_TX_TYPE, H256, MAX_ENCODED_TX_SIZE, U256, U64,
};

pub mod layout;
pub mod wire;


fn check_fee(value: U256, what: &'static str) -> Result<(), TransactionError> {
    if value > U256::from(u64::MAX) {
        return Err(TransactionError::FeeTooBig(what));
    }
    Ok(())
}

/// Mutable set of transaction fields.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    chain_id: Option<L2ChainId>,
    nonce: Option<Nonce>,
    from: Option<Address>,
    to: Option<Address>,
    value: U256,
    data: Vec<u8>,
    gas_limit: u64,
    gas_price: Option<U256>,
    max_priority_fee_per_gas: Option<U256>,
    transaction_type: u8,
    gas_per_pubdata_limit: U256,
    factory_deps: Vec<Vec<u8>>,
    paymaster_params: Option<PaymasterParams>,
    max_encoded_size: usize,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self {
            chain_id: None,
            nonce: None,
            from: None,
            to: None,
            value: U256::zero(),
            data: Vec::new(),
            gas_limit: 0,
            gas_price: None,
            max_priority_fee_per_gas: None,
            transaction_type: EIP_712_TX_TYPE,
            gas_per_pubdata_limit: DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE.into(),
            factory_deps: Vec::new(),
            paymaster_params: None,
            max_encoded_size: MAX_ENCODED_TX_SIZE,
        }
    }

    pub fn chain_id(mut self, chain_id: L2ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn nonce(mut self, nonce: Nonce) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Sets the gas limit; `0` means that gas is not estimated yet.
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Sets the gas price, which is used as `maxFeePerGas`.
    pub fn gas_price(mut self, gas_price: U256) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn max_priority_fee_per_gas(mut self, fee: U256) -> Self {
        self.max_priority_fee_per_gas = Some(fee);
        self
    }

    pub fn transaction_type(mut self, transaction_type: u8) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn gas_per_pubdata_limit(mut self, limit: U256) -> Self {
        self.gas_per_pubdata_limit = limit;
        self
    }

    pub fn factory_deps(mut self, factory_deps: Vec<Vec<u8>>) -> Self {
        self.factory_deps = factory_deps;
        self
    }

    pub fn factory_dep(mut self, bytecode: Vec<u8>) -> Self {
        self.factory_deps.push(bytecode);
        self
    }

    pub fn paymaster_params(mut self, params: PaymasterParams) -> Self {
        self.paymaster_params = Some(params);
        self
    }

    /// Sets the maximum size of the serialized transaction.
    pub fn max_encoded_size(mut self, max_size: usize) -> Self {
        self.max_encoded_size = max_size;
        self
    }

    /// Routes the transaction through the contract deployer: `to` is set to the deployer address,
    /// the created bytecode is appended to factory deps, and `calldata` becomes the transaction data.
    pub fn deployment(mut self, bytecode: Vec<u8>, calldata: Vec<u8>) -> Self {
        self.to = Some(CONTRACT_DEPLOYER_ADDRESS);
        self.factory_deps.push(bytecode);
        self.data = calldata;
        self
    }

    /// Validates the fields and produces a draft transaction.
    pub fn build(self) -> Result<Eip712Transaction, TransactionError> {
        let layout = TxFieldLayout::for_tx_type(self.transaction_type)?;
        let chain_id = self
            .chain_id
            .ok_or(TransactionError::IncompleteTransaction("chain_id"))?;
        let nonce = self
            .nonce
            .ok_or(TransactionError::IncompleteTransaction("nonce"))?;
        let from = self
            .from
            .ok_or(TransactionError::IncompleteTransaction("from"))?;
        let to = self
            .to
            .ok_or(TransactionError::IncompleteTransaction("to"))?;
        let gas_price = self
            .gas_price
            .ok_or(TransactionError::IncompleteTransaction("gas_price"))?;

        check_fee(gas_price, "max fee per gas")?;
        if let Some(fee) = self.max_priority_fee_per_gas {
            check_fee(fee, "max priority fee per gas")?;
        }
        if self.gas_per_pubdata_limit.is_zero() {
            return Err(TransactionError::GasPerPubdataLimitZero);
        }
        check_fee(self.gas_per_pubdata_limit, "gas per pubdata limit")?;
        validate_factory_deps(&self.factory_deps)?;
        let factory_dep_hashes = self
            .factory_deps
            .iter()
            .enumerate()
            .map(|(i, dep)| {
                BytecodeHash::for_bytecode(dep)
                    .map_err(|err| TransactionError::InvalidFactoryDependency(i, err))
            })
            .collect::<Result<_, _>>()?;

        debug!(
            %from, %to, nonce = nonce.0, chain_id = chain_id.0,
            factory_deps = self.factory_deps.len(),
            "built transaction draft"
        );
        Ok(Eip712Transaction {
            layout,
            chain_id,
            nonce,
            from,
            to,
            value: self.value,
            data: self.data,
            gas_limit: self.gas_limit,
            gas_price,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            transaction_type: self.transaction_type,
            gas_per_pubdata_limit: self.gas_per_pubdata_limit,
            factory_deps: self.factory_deps,
            factory_dep_hashes,
            paymaster_params: self.paymaster_params,
            max_encoded_size: self.max_encoded_size,
        })
    }
}

/// Validated transaction draft.
#[derive(Debug, Clone, PartialEq)]
pub struct Eip712Transaction {
    layout: &'static TxFieldLayout,
    chain_id: L2ChainId,
    nonce: Nonce,
    from: Address,
    to: Address,
    value: U256,
    data: Vec<u8>,
    gas_limit: u64,
    gas_price: U256,
    max_priority_fee_per_gas: Option<U256>,
    transaction_type: u8,
    gas_per_pubdata_limit: U256,
    factory_deps: Vec<Vec<u8>>,
    factory_dep_hashes: Vec<BytecodeHash>,
    paymaster_params: Option<PaymasterParams>,
    max_encoded_size: usize,
}

impl Eip712Transaction {
    pub fn layout(&self) -> &'static TxFieldLayout {
        self.layout
    }

    pub fn chain_id(&self) -> L2ChainId {
        self.chain_id
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    pub fn from(&self) -> Address {
        self.from
    }

    pub fn to(&self) -> Address {
        self.to
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    pub fn max_priority_fee_per_gas(&self) -> Option<U256> {
        self.max_priority_fee_per_gas
    }

    /// Priority fee used for hashing and serialization; falls back to the gas price.
    pub fn effective_priority_fee(&self) -> U256 {
        self.max_priority_fee_per_gas.unwrap_or(self.gas_price)
    }

    pub fn transaction_type(&self) -> u8 {
        self.transaction_type
    }

    pub fn gas_per_pubdata_limit(&self) -> U256 {
        self.gas_per_pubdata_limit
    }

    pub fn factory_deps(&self) -> &[Vec<u8>] {
        &self.factory_deps
    }

    /// Hashes of [`Self::factory_deps()`], in the same order.
    pub fn factory_dep_hashes(&self) -> &[BytecodeHash] {
        &self.factory_dep_hashes
    }

    pub fn paymaster_params(&self) -> Option<&PaymasterParams> {
        self.paymaster_params.as_ref()
    }

    pub fn max_encoded_size(&self) -> usize {
        self.max_encoded_size
    }

    /// Returns `true` if the transaction deploys a contract via the contract deployer.
    pub fn is_deployment(&self) -> bool {
        self.to == CONTRACT_DEPLOYER_ADDRESS
    }

    pub fn eip712_meta(&self) -> Eip712Meta {
        Eip712Meta {
            gas_per_pubdata: self.gas_per_pubdata_limit,
            factory_deps: self.factory_deps.clone(),
            custom_signature: None,
            paymaster_params: self.paymaster_params.clone(),
        }
    }

    /// Computes the EIP-712 hash to be signed. Fails if the gas limit is not estimated yet.
    pub fn signing_hash(&self) -> Result<H256, TransactionError> {
        if self.gas_limit == 0 {
            return Err(TransactionError::IncompleteTransaction("gas_limit"));
        }
        Ok(PackedEthSignature::typed_data_to_signed_bytes(
            &Eip712Domain::new(self.chain_id),
            self,
        ))
    }

    /// Fixes the gas limit, making the transaction ready for signing.
    pub fn into_ready(mut self, gas_limit: u64) -> Result<ReadyTransaction, TransactionError> {
        if gas_limit == 0 {
            return Err(TransactionError::IncompleteTransaction("gas_limit"));
        }
        self.gas_limit = gas_limit;
        self.max_priority_fee_per_gas = Some(self.effective_priority_fee());
        Ok(ReadyTransaction(self))
    }

    /// Converts the draft back to a builder, e.g. to change fields after estimation.
    pub fn into_builder(self) -> TransactionBuilder {
        TransactionBuilder {
            chain_id: Some(self.chain_id),
            nonce: Some(self.nonce),
            from: Some(self.from),
            to: Some(self.to),
            value: self.value,
            data: self.data,
            gas_limit: self.gas_limit,
            gas_price: Some(self.gas_price),
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            transaction_type: self.transaction_type,
            gas_per_pubdata_limit: self.gas_per_pubdata_limit,
            factory_deps: self.factory_deps,
            paymaster_params: self.paymaster_params,
            max_encoded_size: self.max_encoded_size,
        }
    }
}

impl EIP712TypedStructure for Eip712Transaction {
    const TYPE_NAME: &'static str = "Transaction";

    fn build_structure<BUILDER: StructBuilder>(&self, builder: &mut BUILDER) {
        for member in self.layout.eip712_members {
            match self.field(member.field) {
                FieldValue::Uint(value) => builder.add_member(member.name, &value),
                FieldValue::Address(address) => {
                    builder.add_member(member.name, &address_to_u256(&address));
                }
                FieldValue::Bytes(bytes) => builder.add_member(member.name, &bytes),
                FieldValue::Bytecodes(_) => {
                    let hashes: Vec<_> = self
                        .factory_dep_hashes
                        .iter()
                        .map(|hash| hash.value())
                        .collect();
                    builder.add_member(member.name, &hashes.as_slice());
                }
            }
        }
    }
}

impl From<&Eip712Transaction> for CallRequest {
    fn from(tx: &Eip712Transaction) -> Self {
        let mut builder = CallRequest::builder()
            .from(tx.from)
            .to(Some(tx.to))
            .max_fee_per_gas(tx.gas_price)
            .max_priority_fee_per_gas(tx.effective_priority_fee())
            .value(tx.value)
            .data(Bytes(tx.data.clone()))
            .nonce(tx.nonce.0.into())
            .transaction_type(U64::from(tx.transaction_type))
            .eip712_meta(tx.eip712_meta());
        if tx.gas_limit != 0 {
            builder = builder.gas(tx.gas_limit.into());
        }
        builder.build()
    }
}

/// Transaction with a known gas limit. It cannot be changed, only signed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyTransaction(Eip712Transaction);

impl Deref for ReadyTransaction {
    type Target = Eip712Transaction;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ReadyTransaction {
    /// Computes the EIP-712 hash to be signed.
    pub fn signing_hash(&self) -> H256 {
        PackedEthSignature::typed_data_to_signed_bytes(&Eip712Domain::new(self.chain_id), &self.0)
    }

    /// Attaches a signature, checking that it was produced by the sender over this transaction.
    pub fn with_signature(
        self,
        signature: PackedEthSignature,
    ) -> Result<SignedTransaction, TransactionError> {
        let signed_hash = self.signing_hash();
        wire::verify_signer(&self, &signature, signed_hash)?;
        debug!(%signed_hash, from = %self.from, "attached signature to transaction");
        Ok(SignedTransaction {
            tx: self,
            signature,
            signed_hash,
        })
    }

    pub fn into_draft(self) -> Eip712Transaction {
        self.0
    }
}

/// Signed transaction. Its fields cannot be changed; [`Self::into_unsigned()`] discards the signature.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    tx: ReadyTransaction,
    signature: PackedEthSignature,
    signed_hash: H256,
}

impl SignedTransaction {
    /// Wraps a transaction without checking the signature; used for decoded transactions.
    pub(crate) fn new_unverified(tx: ReadyTransaction, signature: PackedEthSignature) -> Self {
        let signed_hash = tx.signing_hash();
        Self {
            tx,
            signature,
            signed_hash,
        }
    }

    /// Parses a serialized transaction. The signature is not verified; see [`Self::recover_signer()`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        wire::decode(bytes)
    }

    pub fn transaction(&self) -> &ReadyTransaction {
        &self.tx
    }

    pub fn signature(&self) -> &PackedEthSignature {
        &self.signature
    }

    /// Hash that was signed.
    pub fn signed_hash(&self) -> H256 {
        self.signed_hash
    }

    /// Hash identifying the transaction on the network: `keccak(signedHash ‖ keccak(signature))`.
    pub fn tx_hash(&self) -> H256 {
        let signature_hash = H256(keccak256(&self.signature.serialize_packed()));
        keccak256_concat(self.signed_hash, signature_hash)
    }

    pub fn recover_signer(&self) -> Result<Address, TransactionError> {
        self.signature
            .signature_recover_signer(&self.signed_hash)
            .map_err(|_| TransactionError::MalformedSignature)
    }

    /// Serializes the transaction, re-hashing it and checking the result against the signed hash.
    pub fn encode(&self) -> Result<Vec<u8>, TransactionError> {
        let actual = self.tx.signing_hash();
        if actual != self.signed_hash {
            return Err(EncodingMismatch::Hash {
                signed: self.signed_hash,
                actual,
            }
            .into());
        }
        wire::encode(&self.tx, &self.signature)
    }

    pub fn into_unsigned(self) -> ReadyTransaction {
        self.tx
    }
}
