//! ZKsync types: the EIP-712 transaction envelope and the rules for hashing, serializing
//! and deploying through it.
//!
//! `zksync_types` re-exports the primitive types from `zksync_basic_types` and the signing
//! primitives from `zksync_crypto_primitives`, so that most users only need this crate.

#![allow(clippy::upper_case_acronyms)]

pub use zksync_basic_types::*;
pub use zksync_crypto_primitives::*;

pub use crate::{
    bytecode::{BytecodeHash, InvalidBytecodeError},
    l2::{Eip712Transaction, ReadyTransaction, SignedTransaction, TransactionBuilder},
    transaction_request::{CallRequest, Eip712Meta, PaymasterParams, TransactionError},
};

pub mod bytecode;
pub mod event;
pub mod l2;
pub mod transaction_request;
pub mod utils;

/// Denotes the first byte of the special ZKsync's EIP-712-signed transaction.
pub const EIP_712_TX_TYPE: u8 = 0x71;

/// Address of the system contract routing all contract deployments.
pub const CONTRACT_DEPLOYER_ADDRESS: Address = H160([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x80, 0x06,
]);

/// Gas per pubdata byte limit that is safe to use for transactions on the current networks.
pub const DEFAULT_L2_TX_GAS_PER_PUBDATA_BYTE: u64 = 50_000;

/// Upper bound on the size of a serialized transaction accepted by the node.
pub const MAX_ENCODED_TX_SIZE: usize = 1 << 24;

/// The full nonce stored by the nonce holder is `deployment_nonce * DEPLOYMENT_NONCE_INCREMENT + tx_nonce`.
pub const DEPLOYMENT_NONCE_INCREMENT: U256 = U256([0, 0, 1, 0]); // 2^128
