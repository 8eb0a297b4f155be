//! EraVM bytecode validation and versioned hashing.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::H256;

const MAX_BYTECODE_LENGTH_IN_WORDS: usize = (1 << 16) - 1;
const MAX_BYTECODE_LENGTH_BYTES: usize = MAX_BYTECODE_LENGTH_IN_WORDS * 32;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InvalidBytecodeError {
    #[error("Bytecode too long: {0} bytes, while max {1} allowed")]
    BytecodeTooLong(usize, usize),
    #[error("Bytecode has even number of 32-byte words")]
    BytecodeLengthInWordsIsEven,
    #[error("Bytecode length is not divisible by 32")]
    BytecodeLengthIsNotDivisibleBy32,
}

pub fn validate_bytecode(code: &[u8]) -> Result<(), InvalidBytecodeError> {
    let bytecode_len = code.len();

    if bytecode_len > MAX_BYTECODE_LENGTH_BYTES {
        return Err(InvalidBytecodeError::BytecodeTooLong(
            bytecode_len,
            MAX_BYTECODE_LENGTH_BYTES,
        ));
    }

    if bytecode_len % 32 != 0 {
        return Err(InvalidBytecodeError::BytecodeLengthIsNotDivisibleBy32);
    }

    let bytecode_len_words = bytecode_len / 32;

    if bytecode_len_words % 2 == 0 {
        return Err(InvalidBytecodeError::BytecodeLengthInWordsIsEven);
    }

    Ok(())
}

/// Bytecode marker encoded in the first byte of the bytecode hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BytecodeMarker {
    /// EraVM bytecode marker (1).
    EraVm = 1,
}

/// Versioned hash of an EraVM bytecode: `marker ‖ 0x00 ‖ length in words (u16 BE) ‖ sha256(code)[4..]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BytecodeHash(H256);

impl fmt::Debug for BytecodeHash {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "BytecodeHash({:?})", self.0)
    }
}

impl BytecodeHash {
    /// Hashes the provided EraVM bytecode. Only the length is checked, since it must fit into
    /// the hash; use [`validate_bytecode()`] for full validation. This allows hashing an empty
    /// bytecode, which is a valid input for address derivation.
    pub fn for_bytecode(bytecode: &[u8]) -> Result<Self, InvalidBytecodeError> {
        let too_long =
            || InvalidBytecodeError::BytecodeTooLong(bytecode.len(), MAX_BYTECODE_LENGTH_BYTES);
        if bytecode.len() > MAX_BYTECODE_LENGTH_BYTES {
            return Err(too_long());
        }
        let bytecode_len_in_words = u16::try_from(bytecode.len() / 32).map_err(|_| too_long())?;
        let mut output = [0_u8; 32];
        output.copy_from_slice(&Sha256::digest(bytecode));
        output[0] = BytecodeMarker::EraVm as u8;
        output[1] = 0;
        output[2..4].copy_from_slice(&bytecode_len_in_words.to_be_bytes());
        Ok(Self(H256(output)))
    }

    pub fn marker(&self) -> Option<BytecodeMarker> {
        (self.0[0] == BytecodeMarker::EraVm as u8).then_some(BytecodeMarker::EraVm)
    }

    pub fn len_in_words(&self) -> u16 {
        u16::from_be_bytes([self.0[2], self.0[3]])
    }

    pub fn value(self) -> H256 {
        self.0
    }
}
