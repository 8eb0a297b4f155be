use tracing::trace;

use crate::{
    bytecode::BytecodeHash,
    conversions::{address_to_h256, u256_to_h256},
    web3::keccak256,
    Address, DEPLOYMENT_NONCE_INCREMENT, H256, U256,
};

/// Transforms the *full* account nonce into an *account* nonce and a *deployment* nonce.
///
/// Full nonce is a composite one: it includes both account nonce (number of transactions
/// initiated by the account) and deployer nonce (number of smart contracts deployed by the
/// account).
pub fn decompose_full_nonce(full_nonce: U256) -> (U256, U256) {
    (
        full_nonce % DEPLOYMENT_NONCE_INCREMENT,
        full_nonce / DEPLOYMENT_NONCE_INCREMENT,
    )
}

/// Converts tx nonce + deploy nonce into a full nonce.
pub fn nonces_to_full_nonce(tx_nonce: U256, deploy_nonce: U256) -> U256 {
    DEPLOYMENT_NONCE_INCREMENT * deploy_nonce + tx_nonce
}

/// Pre-calculates the address of the to-be-deployed EraVM contract (via CREATE, not CREATE2).
pub fn deployed_address_create(sender: Address, deploy_nonce: U256) -> Address {
    let prefix_bytes = keccak256("zksyncCreate".as_bytes());
    let address_bytes = address_to_h256(&sender);
    let nonce_bytes = u256_to_h256(deploy_nonce);

    let mut bytes = [0u8; 96];
    bytes[..32].copy_from_slice(&prefix_bytes);
    bytes[32..64].copy_from_slice(address_bytes.as_bytes());
    bytes[64..].copy_from_slice(nonce_bytes.as_bytes());

    let address = Address::from_slice(&keccak256(&bytes)[12..]);
    trace!(%sender, %deploy_nonce, ?address, "derived CREATE address");
    address
}

/// Pre-calculates the address of the EraVM contract deployed via CREATE2.
///
/// `constructor_input` is the ABI-encoded constructor arguments; it is empty for contracts
/// without constructor arguments, in which case its hash is `keccak("")`.
pub fn deployed_address_create2(
    sender: Address,
    salt: H256,
    bytecode_hash: BytecodeHash,
    constructor_input: &[u8],
) -> Address {
    let prefix_bytes = keccak256("zksyncCreate2".as_bytes());
    let address_bytes = address_to_h256(&sender);
    let input_hash = keccak256(constructor_input);

    let mut bytes = [0u8; 160];
    bytes[..32].copy_from_slice(&prefix_bytes);
    bytes[32..64].copy_from_slice(address_bytes.as_bytes());
    bytes[64..96].copy_from_slice(salt.as_bytes());
    bytes[96..128].copy_from_slice(bytecode_hash.value().as_bytes());
    bytes[128..].copy_from_slice(&input_hash);

    let address = Address::from_slice(&keccak256(&bytes)[12..]);
    trace!(%sender, ?salt, ?bytecode_hash, ?address, "derived CREATE2 address");
    address
}

/// Compares an address reported by a node (hex, with or without `0x` prefix, in any letter case)
/// with the expected one.
pub fn is_same_address(reported: &str, expected: &Address) -> bool {
    let reported = reported
        .strip_prefix("0x")
        .or_else(|| reported.strip_prefix("0X"))
        .unwrap_or(reported);
    reported
        .parse::<Address>()
        .is_ok_and(|reported| reported == *expected)
}
