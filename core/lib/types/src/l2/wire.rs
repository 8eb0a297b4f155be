//! Serialization of signed transactions into the `0x71 ‖ rlp([...])` envelope.

use rlp::{DecoderError, Rlp, RlpStream};
use tracing::debug;

use super::{
    layout::{FieldValue, TxField, TxFieldLayout, WireSlot},
    Eip712Transaction, ReadyTransaction, SignedTransaction, TransactionBuilder,
};
use crate::{
    conversions::u256_to_u64_checked,
    transaction_request::{EncodingMismatch, TransactionError},
    L2ChainId, Nonce, PackedEthSignature, PaymasterParams, H256, MAX_ENCODED_TX_SIZE, U256,
};

/// Checks that `signature` over `signed_hash` was produced by the transaction sender.
pub(crate) fn verify_signer(
    tx: &Eip712Transaction,
    signature: &PackedEthSignature,
    signed_hash: H256,
) -> Result<(), TransactionError> {
    let recovered = signature
        .signature_recover_signer(&signed_hash)
        .map_err(|_| TransactionError::MalformedSignature)?;
    if recovered != tx.from() {
        return Err(EncodingMismatch::Signer {
            expected: tx.from(),
            recovered,
        }
        .into());
    }
    Ok(())
}

/// Serializes a signed transaction.
///
/// The transaction is re-hashed and the signature must recover its sender; otherwise,
/// no bytes are produced.
pub fn encode(
    tx: &ReadyTransaction,
    signature: &PackedEthSignature,
) -> Result<Vec<u8>, TransactionError> {
    let signed_hash = tx.signing_hash();
    verify_signer(tx, signature, signed_hash)?;

    let bytes = encode_unchecked(tx, signature);
    if bytes.len() > tx.max_encoded_size() {
        return Err(TransactionError::OversizedData(
            tx.max_encoded_size(),
            bytes.len(),
        ));
    }
    debug!(%signed_hash, len = bytes.len(), "encoded signed transaction");
    Ok(bytes)
}

fn append_field(rlp: &mut RlpStream, value: FieldValue<'_>) {
    match value {
        FieldValue::Uint(value) => {
            rlp.append(&value);
        }
        FieldValue::Address(address) => {
            rlp.append(&address);
        }
        FieldValue::Bytes(bytes) => {
            rlp.append(&bytes);
        }
        FieldValue::Bytecodes(bytecodes) => {
            rlp.begin_list(bytecodes.len());
            for bytecode in bytecodes {
                rlp.append(&bytecode.as_slice());
            }
        }
    }
}

fn encode_unchecked(tx: &Eip712Transaction, signature: &PackedEthSignature) -> Vec<u8> {
    let layout = tx.layout();
    let mut rlp = RlpStream::new_list(layout.wire_slots.len());
    for slot in layout.wire_slots {
        match slot {
            WireSlot::Field(field) => append_field(&mut rlp, tx.field(*field)),
            WireSlot::LegacyV => {
                rlp.append(&tx.chain_id().0);
            }
            WireSlot::Empty => {
                rlp.append_empty_data();
            }
            WireSlot::CustomSignature => {
                rlp.append(&signature.serialize_packed().as_slice());
            }
            WireSlot::PaymasterParams => {
                if let Some(params) = tx.paymaster_params() {
                    rlp.begin_list(2);
                    rlp.append(&params.paymaster.as_bytes());
                    rlp.append(&params.paymaster_input);
                } else {
                    rlp.begin_list(0);
                }
            }
        }
    }

    let payload = rlp.out();
    let mut bytes = Vec::with_capacity(payload.len() + 1);
    bytes.push(layout.tx_type);
    bytes.extend_from_slice(&payload);
    bytes
}

fn decode_field(
    rlp: &Rlp<'_>,
    index: usize,
    field: TxField,
    builder: TransactionBuilder,
) -> Result<TransactionBuilder, TransactionError> {
    Ok(match field {
        TxField::ChainId => builder.chain_id(L2ChainId::try_from(rlp.val_at::<U256>(index)?)?),
        TxField::Nonce => builder.nonce(Nonce::try_from(rlp.val_at::<U256>(index)?)?),
        TxField::From => builder.from(rlp.val_at(index)?),
        TxField::To => builder.to(rlp.val_at(index)?),
        TxField::GasLimit => {
            builder.gas_limit(u256_to_u64_checked(rlp.val_at(index)?, "gas limit")?)
        }
        TxField::GasPerPubdataLimit => builder.gas_per_pubdata_limit(rlp.val_at(index)?),
        TxField::MaxFeePerGas => builder.gas_price(rlp.val_at(index)?),
        TxField::MaxPriorityFeePerGas => builder.max_priority_fee_per_gas(rlp.val_at(index)?),
        TxField::Value => builder.value(rlp.val_at(index)?),
        TxField::Data => builder.data(rlp.val_at(index)?),
        TxField::FactoryDeps => builder.factory_deps(rlp.list_at(index)?),
        // Carried by the type byte and the paymaster list respectively.
        TxField::TxType | TxField::Paymaster | TxField::PaymasterInput => builder,
    })
}

/// Parses a serialized transaction. This is the structural inverse of [`encode()`]; the signature
/// is parsed but not checked against the sender.
pub fn decode(bytes: &[u8]) -> Result<SignedTransaction, TransactionError> {
    if bytes.len() > MAX_ENCODED_TX_SIZE {
        return Err(TransactionError::OversizedData(
            MAX_ENCODED_TX_SIZE,
            bytes.len(),
        ));
    }
    let (&tx_type, payload) = bytes.split_first().ok_or(DecoderError::RlpIsTooShort)?;
    let layout = TxFieldLayout::for_tx_type(tx_type)?;

    let rlp = Rlp::new(payload);
    if rlp.payload_info()?.total() != payload.len() {
        return Err(DecoderError::RlpInconsistentLengthAndData.into());
    }
    if rlp.item_count()? != layout.wire_slots.len() {
        return Err(DecoderError::RlpIncorrectListLen.into());
    }

    let mut builder = TransactionBuilder::new().transaction_type(tx_type);
    let mut signature = None;
    let mut legacy_v = None;
    for (index, slot) in layout.wire_slots.iter().enumerate() {
        match slot {
            WireSlot::Field(field) => {
                builder = decode_field(&rlp, index, *field, builder)?;
            }
            WireSlot::LegacyV => {
                legacy_v = Some(rlp.val_at::<U256>(index)?);
            }
            WireSlot::Empty => {
                rlp.val_at::<U256>(index)?;
            }
            WireSlot::CustomSignature => {
                let raw: Vec<u8> = rlp.val_at(index)?;
                let parsed = PackedEthSignature::deserialize_packed(&raw)
                    .map_err(|_| TransactionError::MalformedSignature)?;
                signature = Some(parsed);
            }
            WireSlot::PaymasterParams => {
                if let Some(params) = PaymasterParams::from_vector(rlp.list_at(index)?)? {
                    builder = builder.paymaster_params(params);
                }
            }
        }
    }
    let signature = signature.ok_or(TransactionError::MalformedSignature)?;

    let draft = builder.build()?;
    // The legacy `v` slot duplicates the chain id.
    if legacy_v.is_some_and(|v| v != U256::from(draft.chain_id().0)) {
        return Err(DecoderError::Custom("legacy v does not match chain id").into());
    }
    let gas_limit = draft.gas_limit();
    let tx = draft.into_ready(gas_limit)?;
    Ok(SignedTransaction::new_unverified(tx, signature))
}
