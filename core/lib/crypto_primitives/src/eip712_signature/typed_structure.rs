use serde::{Deserialize, Serialize};
use zksync_basic_types::{web3::keccak256, L2ChainId, H256, U256};

use crate::eip712_signature::struct_builder::{EncodeBuilder, StructBuilder, TypeBuilder};

/// Interface for defining a structure for the EIP-712 signature.
pub trait EIP712TypedStructure {
    const TYPE_NAME: &'static str;

    /// Feeds the members of the structure to `builder` in their declaration order.
    fn build_structure<BUILDER: StructBuilder>(&self, builder: &mut BUILDER);

    fn encode_type(&self) -> String {
        let mut builder = TypeBuilder::default();
        self.build_structure(&mut builder);
        builder.encode_type(Self::TYPE_NAME)
    }

    fn type_hash(&self) -> H256 {
        H256(keccak256(self.encode_type().as_bytes()))
    }

    fn encode_data(&self) -> Vec<H256> {
        let mut builder = EncodeBuilder::default();
        self.build_structure(&mut builder);
        builder.into_words()
    }

    fn hash_struct(&self) -> H256 {
        let mut builder = EncodeBuilder::default();
        self.build_structure(&mut builder);
        builder.hash_struct(self.type_hash())
    }
}

/// Domain separator for signatures over ZKsync typed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
    /// The user readable name of signing domain, i.e. the name of the DApp or the protocol.
    pub name: String,
    /// The current major version of the signing domain.
    pub version: String,
    /// The chain id the transaction is valid on.
    pub chain_id: U256,
}

impl Eip712Domain {
    /// Name of the protocol.
    pub const NAME: &'static str = "zkSync";
    /// Version of the protocol. While there may be `2.x` releases, the minor release version bump
    /// should not be breaking, meaning that clients from the `2.x-1` version should be able to communicate
    /// with zkSync server. Thus `VERSION` corresponds to the major version only.
    pub const VERSION: &'static str = "2";

    pub fn new(chain_id: L2ChainId) -> Self {
        Self {
            name: Self::NAME.to_owned(),
            version: Self::VERSION.to_owned(),
            chain_id: U256::from(chain_id.0),
        }
    }
}

impl EIP712TypedStructure for Eip712Domain {
    const TYPE_NAME: &'static str = "EIP712Domain";

    fn build_structure<BUILDER: StructBuilder>(&self, builder: &mut BUILDER) {
        builder.add_member("name", &self.name);
        builder.add_member("version", &self.version);
        builder.add_member("chainId", &self.chain_id);
    }
}
