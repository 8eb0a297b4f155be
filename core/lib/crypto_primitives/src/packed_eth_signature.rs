use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use zksync_basic_types::{
    web3::{keccak256, Bytes},
    Address, H256,
};

use crate::{
    ecdsa_signature::{
        public_to_address, recover, sign, Error as EcdsaError, K256PrivateKey,
        Signature as EthSignature,
    },
    eip712_signature::typed_structure::{EIP712TypedStructure, Eip712Domain},
};

/// Signature over EIP-712 typed data, serialized as 65 bytes `r ‖ s ‖ v`.
///
/// Ethereum clients produce `v = 27 + recovery_id`, while the secp256k1 library expects
/// `v = recovery_id`. The structure stores the raw recovery id: 27 is subtracted on
/// deserialization (if present) and added back on serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedEthSignature(EthSignature);

impl PackedEthSignature {
    pub const LENGTH: usize = 65;

    pub fn serialize_packed(&self) -> [u8; 65] {
        // adds 27 to v
        self.0.into_electrum()
    }

    pub fn deserialize_packed(bytes: &[u8]) -> Result<Self, DeserializeError> {
        let mut signature: [u8; 65] = bytes
            .try_into()
            .map_err(|_| DeserializeError::IncorrectSignatureLength(bytes.len()))?;
        if signature[64] >= 27 {
            signature[64] -= 27;
        }
        let signature = EthSignature::from(signature);
        if signature.v() > 1 {
            return Err(DeserializeError::InvalidRecoveryId(signature.v()));
        }
        if !signature.is_low_s() {
            return Err(DeserializeError::HighS);
        }
        Ok(Self(signature))
    }

    pub fn sign_raw(
        private_key: &K256PrivateKey,
        signed_bytes: &H256,
    ) -> Result<PackedEthSignature, EcdsaError> {
        let signature = sign(private_key, signed_bytes)?;
        Ok(PackedEthSignature(signature))
    }

    /// Signs typed struct using Ethereum private key by EIP-712 signature standard.
    /// Result of this function is the equivalent of RPC calling `eth_signTypedData`.
    pub fn sign_typed_data(
        private_key: &K256PrivateKey,
        domain: &Eip712Domain,
        typed_struct: &impl EIP712TypedStructure,
    ) -> Result<PackedEthSignature, EcdsaError> {
        let signed_bytes = Self::typed_data_to_signed_bytes(domain, typed_struct);
        Self::sign_raw(private_key, &signed_bytes)
    }

    /// Computes `keccak(0x19 ‖ 0x01 ‖ domainSeparator ‖ hashStruct(message))`.
    pub fn typed_data_to_signed_bytes(
        domain: &Eip712Domain,
        typed_struct: &impl EIP712TypedStructure,
    ) -> H256 {
        let mut bytes = Vec::with_capacity(66);
        bytes.extend_from_slice(b"\x19\x01");
        bytes.extend_from_slice(domain.hash_struct().as_bytes());
        bytes.extend_from_slice(typed_struct.hash_struct().as_bytes());
        H256(keccak256(&bytes))
    }

    /// Checks signature and returns Ethereum address of the signer.
    /// `signed_bytes` is the digest that was signed, without any prefixes.
    pub fn signature_recover_signer(&self, signed_bytes: &H256) -> Result<Address, EcdsaError> {
        let public_key = recover(&self.0, signed_bytes)?;
        Ok(public_to_address(&public_key))
    }

    pub fn from_rsv(r: &H256, s: &H256, v: u8) -> Self {
        PackedEthSignature(EthSignature::from_rsv(r, s, v))
    }

    pub fn r(&self) -> &[u8] {
        self.0.r()
    }

    pub fn s(&self) -> &[u8] {
        self.0.s()
    }

    pub fn v(&self) -> u8 {
        self.0.v()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DeserializeError {
    #[error("Eth signature length should be 65 bytes, got {0}")]
    IncorrectSignatureLength(usize),
    #[error("Eth signature has invalid recovery id {0}")]
    InvalidRecoveryId(u8),
    #[error("Eth signature is not canonical (high `s`)")]
    HighS,
}

impl Serialize for PackedEthSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Bytes(self.serialize_packed().to_vec()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PackedEthSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Bytes::deserialize(deserializer)?;
        Self::deserialize_packed(&bytes.0).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn signed_digest() -> (K256PrivateKey, H256, PackedEthSignature) {
        let key = K256PrivateKey::from_bytes(H256::repeat_byte(7)).unwrap();
        let digest = H256::repeat_byte(0xab);
        let signature = PackedEthSignature::sign_raw(&key, &digest).unwrap();
        (key, digest, signature)
    }

    #[test]
    fn packed_signature_adds_27_to_v() {
        let (_, _, signature) = signed_digest();
        let packed = signature.serialize_packed();
        assert!(packed[64] == 27 || packed[64] == 28);
        assert_eq!(packed[64] - 27, signature.v());

        let restored = PackedEthSignature::deserialize_packed(&packed).unwrap();
        assert_eq!(restored, signature);
    }

    #[test]
    fn raw_v_is_accepted_on_deserialization() {
        let (_, _, signature) = signed_digest();
        let mut packed = signature.serialize_packed();
        packed[64] -= 27;
        let restored = PackedEthSignature::deserialize_packed(&packed).unwrap();
        assert_eq!(restored, signature);
    }

    #[test]
    fn malformed_signatures_are_rejected() {
        let (_, _, signature) = signed_digest();
        let packed = signature.serialize_packed();

        assert_eq!(
            PackedEthSignature::deserialize_packed(&packed[..64]),
            Err(DeserializeError::IncorrectSignatureLength(64))
        );

        let mut bad_v = packed;
        bad_v[64] = 30;
        assert_eq!(
            PackedEthSignature::deserialize_packed(&bad_v),
            Err(DeserializeError::InvalidRecoveryId(3))
        );

        let mut high_s = packed;
        high_s[32..64].copy_from_slice(&[0xff; 32]);
        assert_eq!(
            PackedEthSignature::deserialize_packed(&high_s),
            Err(DeserializeError::HighS)
        );
    }

    #[test]
    fn signer_is_recovered() {
        let (key, digest, signature) = signed_digest();
        assert_eq!(
            signature.signature_recover_signer(&digest).unwrap(),
            key.address()
        );

        let other_digest = H256::repeat_byte(0xac);
        let recovered = signature.signature_recover_signer(&other_digest);
        assert_matches!(recovered, Ok(address) if address != key.address());
    }

    #[test]
    fn serde_uses_prefixed_hex() {
        let (_, _, signature) = signed_digest();
        let json = serde_json::to_string(&signature).unwrap();
        assert!(json.starts_with("\"0x"));
        assert_eq!(json.len(), 2 + 2 + 130);
        let restored: PackedEthSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, signature);
    }
}
