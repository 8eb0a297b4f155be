//! Hashing and JSON-RPC data shapes shared with Ethereum tooling.

use std::fmt;

use serde::{
    de::{Error, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use tiny_keccak::{Hasher, Keccak};

use crate::{Address, H256, U256, U64};


/// Computes the Keccak-256 hash of the input.
pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    let mut hasher = Keccak::v256();
    hasher.update(bytes);
    hasher.finalize(&mut output);
    output
}

/// Hashes the concatenation of two hashes.
pub fn keccak256_concat(hash1: H256, hash2: H256) -> H256 {
    let mut bytes = [0_u8; 64];
    bytes[..32].copy_from_slice(hash1.as_bytes());
    bytes[32..].copy_from_slice(hash2.as_bytes());
    H256(keccak256(&bytes))
}

/// Raw bytes wrapper serialized as a `0x`-prefixed hex string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl<T: Into<Vec<u8>>> From<T> for Bytes {
    fn from(data: T) -> Self {
        Bytes(data.into())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut serialized = "0x".to_owned();
        serialized.push_str(&hex::encode(&self.0));
        serializer.serialize_str(serialized.as_ref())
    }
}

impl<'a> Deserialize<'a> for Bytes {
    fn deserialize<D: Deserializer<'a>>(deserializer: D) -> Result<Bytes, D::Error> {
        deserializer.deserialize_identifier(BytesVisitor)
    }
}

struct BytesVisitor;

impl<'a> Visitor<'a> for BytesVisitor {
    type Value = Bytes;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "a 0x-prefixed hex-encoded vector of bytes")
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
        if let Some(stripped) = value.strip_prefix("0x") {
            let bytes =
                hex::decode(stripped).map_err(|e| Error::custom(format!("Invalid hex: {e}")))?;
            Ok(Bytes(bytes))
        } else {
            Err(Error::invalid_value(
                serde::de::Unexpected::Str(value),
                &"0x prefix",
            ))
        }
    }

    fn visit_string<E: Error>(self, value: String) -> Result<Self::Value, E> {
        self.visit_str(value.as_ref())
    }
}

/// A log entry produced by a transaction, as returned in `eth_getTransactionReceipt`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Address of the contract that emitted the log.
    pub address: Address,
    /// Indexed topics; the first one is the event signature for non-anonymous events.
    pub topics: Vec<H256>,
    /// Non-indexed data.
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<H256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<H256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_index: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}
