//! Conversions between fixed-width hash and integer representations.

use crate::{Address, H256, U256};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("{what} does not fit into 64 bits: {value}")]
    Overflow { what: &'static str, value: U256 },
}

pub fn h256_to_u256(num: H256) -> U256 {
    U256::from_big_endian(num.as_bytes())
}

pub fn u256_to_h256(num: U256) -> H256 {
    let mut bytes = [0u8; 32];
    num.to_big_endian(&mut bytes);
    H256(bytes)
}

/// Left-pads the address to 32 bytes.
pub fn address_to_h256(address: &Address) -> H256 {
    let mut buffer = [0u8; 32];
    buffer[12..].copy_from_slice(address.as_bytes());
    H256(buffer)
}

pub fn address_to_u256(address: &Address) -> U256 {
    h256_to_u256(address_to_h256(address))
}

/// Takes the low-order 20 bytes of a 32-byte word.
pub fn h256_to_address(value: &H256) -> Address {
    Address::from_slice(&value.as_bytes()[12..])
}

/// Narrows an externally supplied 256-bit value, rejecting anything above `u64::MAX`.
pub fn u256_to_u64_checked(value: U256, what: &'static str) -> Result<u64, ConversionError> {
    if value > U256::from(u64::MAX) {
        return Err(ConversionError::Overflow { what, value });
    }
    Ok(value.low_u64())
}
