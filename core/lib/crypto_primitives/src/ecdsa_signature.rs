//! secp256k1 keys and recoverable signatures.

use std::fmt;

use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, PublicKey, SecretKey, SECP256K1,
};
use zksync_basic_types::{web3::keccak256, Address, H256, U256};

/// Order of the secp256k1 curve group.
const SECP256K1_N: U256 = U256([
    0xbfd2_5e8c_d036_4141,
    0xbaae_dce6_af48_a03b,
    0xffff_ffff_ffff_fffe,
    0xffff_ffff_ffff_ffff,
]);

/// Half of [`SECP256K1_N`], the largest `s` accepted as canonical.
const SECP256K1_HALF_N: U256 = U256([
    0xdfe9_2f46_681b_20a0,
    0x5d57_6e73_57a4_501d,
    0xffff_ffff_ffff_ffff,
    0x7fff_ffff_ffff_ffff,
]);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid private key")]
    InvalidSecretKey,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),
    #[error("non-canonical signature: `s` is in the upper half of the curve order")]
    HighS,
    #[error(transparent)]
    Secp(#[from] secp256k1::Error),
}

/// Private key for the secp256k1 curve.
#[derive(Clone, PartialEq, Eq)]
pub struct K256PrivateKey(SecretKey);

impl fmt::Debug for K256PrivateKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("K256PrivateKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl K256PrivateKey {
    /// Parses a private key. Fails for zero and for values not below the curve order.
    pub fn from_bytes(bytes: H256) -> Result<Self, Error> {
        SecretKey::from_slice(bytes.as_bytes())
            .map(Self)
            .map_err(|_| Error::InvalidSecretKey)
    }

    /// Generates a random private key using the thread-local RNG.
    pub fn random() -> Self {
        loop {
            if let Ok(this) = Self::from_bytes(H256(rand::random())) {
                return this;
            }
        }
    }

    pub fn expose_secret(&self) -> H256 {
        H256(self.0.secret_bytes())
    }

    pub fn address(&self) -> Address {
        public_to_address(&PublicKey::from_secret_key_global(&self.0))
    }
}

/// Recoverable signature in the `(r, s, v)` form, with `v` being the raw recovery id (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signature {
    r: H256,
    s: H256,
    v: u8,
}

impl Signature {
    pub fn from_rsv(r: &H256, s: &H256, v: u8) -> Self {
        Self { r: *r, s: *s, v }
    }

    pub fn r(&self) -> &[u8] {
        self.r.as_bytes()
    }

    pub fn s(&self) -> &[u8] {
        self.s.as_bytes()
    }

    pub fn v(&self) -> u8 {
        self.v
    }

    /// Checks that `s` lies in the lower half of the curve order.
    pub fn is_low_s(&self) -> bool {
        U256::from_big_endian(self.s.as_bytes()) <= SECP256K1_HALF_N
    }

    /// Serializes the signature with `v` shifted by 27.
    pub fn into_electrum(self) -> [u8; 65] {
        let mut bytes = [0_u8; 65];
        bytes[..32].copy_from_slice(self.r.as_bytes());
        bytes[32..64].copy_from_slice(self.s.as_bytes());
        bytes[64] = self.v + 27;
        bytes
    }

    /// Mirrors `s` into the lower half of the curve order, flipping the recovery id.
    fn normalize_s(mut self) -> Self {
        let s = U256::from_big_endian(self.s.as_bytes());
        if s > SECP256K1_HALF_N {
            let mut normalized = [0_u8; 32];
            (SECP256K1_N - s).to_big_endian(&mut normalized);
            self.s = H256(normalized);
            self.v ^= 1;
        }
        self
    }

    fn to_recoverable(self) -> Result<RecoverableSignature, Error> {
        let recovery_id =
            RecoveryId::from_i32(self.v.into()).map_err(|_| Error::InvalidRecoveryId(self.v))?;
        let mut data = [0_u8; 64];
        data[..32].copy_from_slice(self.r.as_bytes());
        data[32..].copy_from_slice(self.s.as_bytes());
        RecoverableSignature::from_compact(&data, recovery_id).map_err(|_| Error::InvalidSignature)
    }
}

impl From<[u8; 65]> for Signature {
    fn from(bytes: [u8; 65]) -> Self {
        Self {
            r: H256::from_slice(&bytes[..32]),
            s: H256::from_slice(&bytes[32..64]),
            v: bytes[64],
        }
    }
}

/// Signs a 32-byte digest. The produced signature is deterministic (RFC 6979) and has low `s`.
pub fn sign(private_key: &K256PrivateKey, message: &H256) -> Result<Signature, Error> {
    let message = Message::from_slice(message.as_bytes())?;
    let signature = SECP256K1.sign_ecdsa_recoverable(&message, &private_key.0);
    let (recovery_id, data) = signature.serialize_compact();
    let signature = Signature {
        r: H256::from_slice(&data[..32]),
        s: H256::from_slice(&data[32..]),
        // Recovery ids produced by signing are always 0 or 1.
        v: recovery_id.to_i32() as u8,
    };
    Ok(signature.normalize_s())
}

/// Recovers the public key that produced `signature` over `message`.
pub fn recover(signature: &Signature, message: &H256) -> Result<PublicKey, Error> {
    if !signature.is_low_s() {
        return Err(Error::HighS);
    }
    let message = Message::from_slice(message.as_bytes())?;
    let public_key = SECP256K1.recover_ecdsa(&message, &signature.to_recoverable()?)?;
    Ok(public_key)
}

/// Converts a public key into an Ethereum address: the last 20 bytes of the Keccak hash
/// of its uncompressed encoding without the `0x04` tag.
pub fn public_to_address(public: &PublicKey) -> Address {
    let serialized = public.serialize_uncompressed();
    let hash = keccak256(&serialized[1..]);
    Address::from_slice(&hash[12..])
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn key_one() -> K256PrivateKey {
        K256PrivateKey::from_bytes(H256::from_low_u64_be(1)).unwrap()
    }

    #[test]
    fn address_of_known_key() {
        let expected: Address = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
            .parse()
            .unwrap();
        assert_eq!(key_one().address(), expected);
    }

    #[test]
    fn zero_key_is_rejected() {
        assert_matches!(
            K256PrivateKey::from_bytes(H256::zero()),
            Err(Error::InvalidSecretKey)
        );
        assert_matches!(
            K256PrivateKey::from_bytes(H256::repeat_byte(0xff)),
            Err(Error::InvalidSecretKey)
        );
    }

    #[test]
    fn debug_output_does_not_leak_key() {
        let key = K256PrivateKey::from_bytes(H256::repeat_byte(0x42)).unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("4242"), "{debug}");
    }

    #[test]
    fn signing_is_deterministic_and_recoverable() {
        let key = key_one();
        let message = H256::repeat_byte(0x11);
        let first = sign(&key, &message).unwrap();
        let second = sign(&key, &message).unwrap();
        assert_eq!(first, second);
        assert!(first.is_low_s());
        assert!(first.v() <= 1);

        let public_key = recover(&first, &message).unwrap();
        assert_eq!(public_to_address(&public_key), key.address());
    }

    #[test]
    fn random_keys_differ() {
        let first = K256PrivateKey::random();
        let second = K256PrivateKey::random();
        assert_ne!(first.expose_secret(), second.expose_secret());
    }

    #[test]
    fn high_s_signature_is_rejected() {
        let key = key_one();
        let message = H256::repeat_byte(0x22);
        let signature = sign(&key, &message).unwrap();

        let s = U256::from_big_endian(signature.s());
        let mut high_s = [0_u8; 32];
        (SECP256K1_N - s).to_big_endian(&mut high_s);
        let malleated = Signature::from_rsv(&signature.r, &H256(high_s), signature.v() ^ 1);
        assert!(!malleated.is_low_s());
        assert_matches!(recover(&malleated, &message), Err(Error::HighS));
        assert_eq!(malleated.normalize_s(), signature);
    }

    #[test]
    fn recovery_id_out_of_range() {
        let signature = Signature::from_rsv(&H256::repeat_byte(1), &H256::repeat_byte(1), 7);
        assert_matches!(
            recover(&signature, &H256::zero()),
            Err(Error::InvalidRecoveryId(7))
        );
    }

    #[test]
    fn electrum_encoding_shifts_v() {
        let signature = Signature::from_rsv(&H256::repeat_byte(1), &H256::repeat_byte(2), 1);
        let bytes = signature.into_electrum();
        assert_eq!(bytes[64], 28);
        assert_eq!(&bytes[..32], &[1; 32]);
    }
}
