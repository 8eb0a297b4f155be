//! Field-order table shared by the typed-data encoder and the wire serializer.
//!
//! Both the EIP-712 struct hash and the RLP envelope are produced by walking the same
//! [`TxFieldLayout`] and reading values through [`Eip712Transaction::field()`], so the two
//! representations cannot drift apart.

use crate::{
    l2::Eip712Transaction, transaction_request::TransactionError, Address, EIP_712_TX_TYPE, U256,
};

/// Logical transaction field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxField {
    TxType,
    ChainId,
    Nonce,
    From,
    To,
    GasLimit,
    GasPerPubdataLimit,
    MaxFeePerGas,
    MaxPriorityFeePerGas,
    Paymaster,
    Value,
    Data,
    FactoryDeps,
    PaymasterInput,
}

/// Value of a [`TxField`] as stored in the transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Uint(U256),
    Address(Address),
    Bytes(&'a [u8]),
    Bytecodes(&'a [Vec<u8>]),
}

/// Member of the EIP-712 `Transaction` structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip712Member {
    pub name: &'static str,
    /// Solidity type of the member as it appears in the encoded type.
    pub solidity_type: &'static str,
    pub field: TxField,
}

/// Slot of the RLP list following the type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireSlot {
    Field(TxField),
    /// Legacy `v` slot; carries the chain id.
    LegacyV,
    /// Legacy `r` / `s` slots, encoded as empty strings.
    Empty,
    /// Packed `r ‖ s ‖ v` signature.
    CustomSignature,
    /// `[paymaster, paymasterInput]`, or an empty list if there is no paymaster.
    PaymasterParams,
}

/// Versioned description of a transaction variant.
#[derive(Debug, PartialEq, Eq)]
pub struct TxFieldLayout {
    pub version: u16,
    pub tx_type: u8,
    pub type_name: &'static str,
    pub eip712_members: &'static [Eip712Member],
    pub wire_slots: &'static [WireSlot],
}

const fn member(name: &'static str, solidity_type: &'static str, field: TxField) -> Eip712Member {
    Eip712Member {
        name,
        solidity_type,
        field,
    }
}

pub static EIP712_TX_LAYOUT: TxFieldLayout = TxFieldLayout {
    version: 1,
    tx_type: EIP_712_TX_TYPE,
    type_name: "Transaction",
    eip712_members: &[
        member("txType", "uint256", TxField::TxType),
        member("from", "uint256", TxField::From),
        member("to", "uint256", TxField::To),
        member("gasLimit", "uint256", TxField::GasLimit),
        member(
            "gasPerPubdataByteLimit",
            "uint256",
            TxField::GasPerPubdataLimit,
        ),
        member("maxFeePerGas", "uint256", TxField::MaxFeePerGas),
        member(
            "maxPriorityFeePerGas",
            "uint256",
            TxField::MaxPriorityFeePerGas,
        ),
        member("paymaster", "uint256", TxField::Paymaster),
        member("nonce", "uint256", TxField::Nonce),
        member("value", "uint256", TxField::Value),
        member("data", "bytes", TxField::Data),
        member("factoryDeps", "bytes32[]", TxField::FactoryDeps),
        member("paymasterInput", "bytes", TxField::PaymasterInput),
    ],
    wire_slots: &[
        WireSlot::Field(TxField::Nonce),
        WireSlot::Field(TxField::MaxPriorityFeePerGas),
        WireSlot::Field(TxField::MaxFeePerGas),
        WireSlot::Field(TxField::GasLimit),
        WireSlot::Field(TxField::To),
        WireSlot::Field(TxField::Value),
        WireSlot::Field(TxField::Data),
        WireSlot::LegacyV,
        WireSlot::Empty,
        WireSlot::Empty,
        WireSlot::Field(TxField::ChainId),
        WireSlot::Field(TxField::From),
        WireSlot::Field(TxField::GasPerPubdataLimit),
        WireSlot::Field(TxField::FactoryDeps),
        WireSlot::CustomSignature,
        WireSlot::PaymasterParams,
    ],
};

impl TxFieldLayout {
    /// Returns the layout for the given transaction type tag.
    pub fn for_tx_type(tx_type: u8) -> Result<&'static Self, TransactionError> {
        match tx_type {
            EIP_712_TX_TYPE => Ok(&EIP712_TX_LAYOUT),
            _ => Err(TransactionError::UnsupportedVariant(tx_type)),
        }
    }

    /// Returns the `encodeType` string declared by the table.
    pub fn encode_type(&self) -> String {
        let members: Vec<_> = self
            .eip712_members
            .iter()
            .map(|member| format!("{} {}", member.solidity_type, member.name))
            .collect();
        format!("{}({})", self.type_name, members.join(","))
    }

    /// Index of the RLP slot holding `field`, if the field is transmitted as is.
    pub fn wire_position(&self, field: TxField) -> Option<usize> {
        self.wire_slots
            .iter()
            .position(|slot| *slot == WireSlot::Field(field))
    }
}

impl Eip712Transaction {
    /// Single accessor used by both the typed-data encoder and the wire serializer.
    pub fn field(&self, field: TxField) -> FieldValue<'_> {
        let paymaster_params = self.paymaster_params.as_ref();
        match field {
            TxField::TxType => FieldValue::Uint(self.transaction_type.into()),
            TxField::ChainId => FieldValue::Uint(self.chain_id.0.into()),
            TxField::Nonce => FieldValue::Uint(self.nonce.0.into()),
            TxField::From => FieldValue::Address(self.from),
            TxField::To => FieldValue::Address(self.to),
            TxField::GasLimit => FieldValue::Uint(self.gas_limit.into()),
            TxField::GasPerPubdataLimit => FieldValue::Uint(self.gas_per_pubdata_limit),
            TxField::MaxFeePerGas => FieldValue::Uint(self.gas_price),
            TxField::MaxPriorityFeePerGas => FieldValue::Uint(self.effective_priority_fee()),
            TxField::Paymaster => FieldValue::Address(
                paymaster_params
                    .map(|params| params.paymaster)
                    .unwrap_or_default(),
            ),
            TxField::Value => FieldValue::Uint(self.value),
            TxField::Data => FieldValue::Bytes(&self.data),
            TxField::FactoryDeps => FieldValue::Bytecodes(&self.factory_deps),
            TxField::PaymasterInput => FieldValue::Bytes(
                paymaster_params
                    .map(|params| params.paymaster_input.as_slice())
                    .unwrap_or_default(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn declared_type_matches_network_definition() {
        assert_eq!(
            EIP712_TX_LAYOUT.encode_type(),
            "Transaction(uint256 txType,uint256 from,uint256 to,uint256 gasLimit,\
             uint256 gasPerPubdataByteLimit,uint256 maxFeePerGas,uint256 maxPriorityFeePerGas,\
             uint256 paymaster,uint256 nonce,uint256 value,bytes data,bytes32[] factoryDeps,\
             bytes paymasterInput)"
        );
    }

    #[test]
    fn wire_layout_has_expected_positions() {
        let layout = &EIP712_TX_LAYOUT;
        assert_eq!(layout.wire_slots.len(), 16);
        assert_eq!(layout.wire_position(TxField::Nonce), Some(0));
        assert_eq!(layout.wire_position(TxField::To), Some(4));
        assert_eq!(layout.wire_position(TxField::ChainId), Some(10));
        assert_eq!(layout.wire_position(TxField::From), Some(11));
        assert_eq!(layout.wire_position(TxField::FactoryDeps), Some(13));
        assert_eq!(layout.wire_slots[7], WireSlot::LegacyV);
        assert_eq!(layout.wire_slots[14], WireSlot::CustomSignature);
        // Paymaster fields are transmitted together in a nested list.
        assert_eq!(layout.wire_position(TxField::Paymaster), None);
    }

    #[test]
    fn every_signed_field_is_transmitted() {
        let layout = &EIP712_TX_LAYOUT;
        let transmitted: HashSet<_> = layout
            .wire_slots
            .iter()
            .filter_map(|slot| match slot {
                WireSlot::Field(field) => Some(*field),
                _ => None,
            })
            .collect();

        for member in layout.eip712_members {
            let covered = match member.field {
                TxField::TxType => true, // type byte
                TxField::Paymaster | TxField::PaymasterInput => {
                    layout.wire_slots.contains(&WireSlot::PaymasterParams)
                }
                field => transmitted.contains(&field),
            };
            assert!(covered, "{member:?} is not transmitted");
        }
    }

    #[test]
    fn unknown_tx_types_are_rejected() {
        assert_eq!(TxFieldLayout::for_tx_type(0x71).unwrap().version, 1);
        assert_matches!(
            TxFieldLayout::for_tx_type(0x02),
            Err(TransactionError::UnsupportedVariant(0x02))
        );
    }
}
