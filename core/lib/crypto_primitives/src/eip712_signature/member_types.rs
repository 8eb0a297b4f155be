use zksync_basic_types::{web3::keccak256, Address, H256, U256};

use crate::eip712_signature::struct_builder::encode_address;

/// Type that can be a member of an EIP-712 structure.
pub trait EncodedStructureMember {
    /// Solidity type name of the member, as it appears in the encoded type.
    const MEMBER_TYPE: &'static str;

    /// Encodes the member into a single 32-byte word of `encodeData`.
    fn encode_member_data(&self) -> H256;
}

impl EncodedStructureMember for U256 {
    const MEMBER_TYPE: &'static str = "uint256";

    fn encode_member_data(&self) -> H256 {
        let mut bytes = [0_u8; 32];
        self.to_big_endian(&mut bytes);
        H256(bytes)
    }
}

impl EncodedStructureMember for H256 {
    const MEMBER_TYPE: &'static str = "bytes32";

    fn encode_member_data(&self) -> H256 {
        *self
    }
}

impl EncodedStructureMember for Address {
    const MEMBER_TYPE: &'static str = "address";

    fn encode_member_data(&self) -> H256 {
        encode_address(self)
    }
}

impl EncodedStructureMember for bool {
    const MEMBER_TYPE: &'static str = "bool";

    fn encode_member_data(&self) -> H256 {
        U256::from(*self as u8).encode_member_data()
    }
}

impl EncodedStructureMember for &str {
    const MEMBER_TYPE: &'static str = "string";

    fn encode_member_data(&self) -> H256 {
        H256(keccak256(self.as_bytes()))
    }
}

impl EncodedStructureMember for String {
    const MEMBER_TYPE: &'static str = "string";

    fn encode_member_data(&self) -> H256 {
        self.as_str().encode_member_data()
    }
}

impl EncodedStructureMember for &[u8] {
    const MEMBER_TYPE: &'static str = "bytes";

    fn encode_member_data(&self) -> H256 {
        H256(keccak256(self))
    }
}

impl EncodedStructureMember for &[H256] {
    const MEMBER_TYPE: &'static str = "bytes32[]";

    fn encode_member_data(&self) -> H256 {
        let concatenated: Vec<u8> = self.iter().flat_map(|hash| hash.0).collect();
        H256(keccak256(&concatenated))
    }
}
