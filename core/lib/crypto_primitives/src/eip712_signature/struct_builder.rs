use zksync_basic_types::{web3::keccak256, Address, H256};

use crate::eip712_signature::member_types::EncodedStructureMember;

/// Visitor over the members of an EIP-712 structure.
pub trait StructBuilder {
    fn add_member<MEMBER: EncodedStructureMember>(&mut self, name: &str, member: &MEMBER);
}

/// Collects the member declarations of a structure, producing `encodeType`.
#[derive(Debug, Default)]
pub struct TypeBuilder {
    members: Vec<(String, &'static str)>,
}

impl TypeBuilder {
    pub fn encode_type(&self, type_name: &str) -> String {
        let members: Vec<_> = self
            .members
            .iter()
            .map(|(name, member_type)| format!("{member_type} {name}"))
            .collect();
        format!("{type_name}({})", members.join(","))
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(|(name, _)| name.as_str())
    }
}

impl StructBuilder for TypeBuilder {
    fn add_member<MEMBER: EncodedStructureMember>(&mut self, name: &str, _member: &MEMBER) {
        self.members.push((name.to_owned(), MEMBER::MEMBER_TYPE));
    }
}

/// Collects the encoded member words of a structure, producing `encodeData`.
#[derive(Debug, Default)]
pub struct EncodeBuilder {
    words: Vec<H256>,
}

impl EncodeBuilder {
    pub fn into_words(self) -> Vec<H256> {
        self.words
    }

    /// Computes `keccak(typeHash ‖ encodeData)`.
    pub fn hash_struct(self, type_hash: H256) -> H256 {
        let mut bytes = Vec::with_capacity(32 * (self.words.len() + 1));
        bytes.extend_from_slice(type_hash.as_bytes());
        for word in &self.words {
            bytes.extend_from_slice(word.as_bytes());
        }
        H256(keccak256(&bytes))
    }
}

impl StructBuilder for EncodeBuilder {
    fn add_member<MEMBER: EncodedStructureMember>(&mut self, _name: &str, member: &MEMBER) {
        self.words.push(member.encode_member_data());
    }
}

pub(crate) fn encode_address(address: &Address) -> H256 {
    let mut bytes = [0_u8; 32];
    bytes[12..].copy_from_slice(address.as_bytes());
    H256(bytes)
}
