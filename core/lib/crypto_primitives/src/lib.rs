//! Cryptographic primitives used to sign ZKsync transactions.

pub use self::{
    ecdsa_signature::K256PrivateKey,
    eip712_signature::{
        member_types::EncodedStructureMember,
        struct_builder::StructBuilder,
        typed_structure::{EIP712TypedStructure, Eip712Domain},
    },
    packed_eth_signature::{DeserializeError, PackedEthSignature},
};

pub mod ecdsa_signature;
pub mod eip712_signature;
pub mod packed_eth_signature;
