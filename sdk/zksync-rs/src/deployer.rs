//! Interaction with the contract deployer system contract.

use once_cell::sync::Lazy;
use tracing::debug;
use zksync_types::{
    ethabi::{Contract, Token},
    event::extract_deployed_address,
    utils::{deployed_address_create, deployed_address_create2},
    web3::Log,
    Address, BytecodeHash, CONTRACT_DEPLOYER_ADDRESS, H256, U256,
};

use crate::{error::ClientError, utils::load_contract};

const ICONTRACT_DEPLOYER_INTERFACE: &str = include_str!("./abi/IContractDeployer.json");

static CONTRACT_DEPLOYER: Lazy<Contract> =
    Lazy::new(|| load_contract(ICONTRACT_DEPLOYER_INTERFACE));

/// Prepares calls to the contract deployer and predicts the resulting contract addresses.
#[derive(Debug, Clone, Copy)]
pub struct ContractDeployer {
    address: Address,
}

impl Default for ContractDeployer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractDeployer {
    pub fn new() -> Self {
        Self {
            address: CONTRACT_DEPLOYER_ADDRESS,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &'static Contract {
        &CONTRACT_DEPLOYER
    }

    fn encode_call(
        &self,
        function: &str,
        bytecode: &[u8],
        call_data: &[u8],
        salt: H256,
    ) -> Result<Vec<u8>, ClientError> {
        let bytecode_hash = BytecodeHash::for_bytecode(bytecode)?.value();
        let input = self.abi().function(function)?.encode_input(&[
            Token::FixedBytes(salt.as_bytes().to_vec()),
            Token::FixedBytes(bytecode_hash.as_bytes().to_vec()),
            Token::Bytes(call_data.to_vec()),
        ])?;
        debug!(function, ?bytecode_hash, ?salt, "encoded contract deployer call");
        Ok(input)
    }

    /// Encodes `create(salt, bytecodeHash, input)`. The salt does not influence the address of
    /// the deployed contract; it is zero if not provided.
    pub fn encode_create(
        &self,
        bytecode: &[u8],
        call_data: &[u8],
        salt: Option<H256>,
    ) -> Result<Vec<u8>, ClientError> {
        self.encode_call("create", bytecode, call_data, salt.unwrap_or_default())
    }

    /// Encodes `create2(salt, bytecodeHash, input)`.
    pub fn encode_create2(
        &self,
        bytecode: &[u8],
        call_data: &[u8],
        salt: H256,
    ) -> Result<Vec<u8>, ClientError> {
        self.encode_call("create2", bytecode, call_data, salt)
    }

    /// Predicts the address of a contract deployed with `create` given the sender's *deployment* nonce.
    pub fn compute_l2_create_address(&self, sender: Address, deployment_nonce: U256) -> Address {
        deployed_address_create(sender, deployment_nonce)
    }

    pub fn compute_l2_create2_address(
        &self,
        sender: Address,
        bytecode: &[u8],
        constructor: &[u8],
        salt: H256,
    ) -> Result<Address, ClientError> {
        let bytecode_hash = BytecodeHash::for_bytecode(bytecode)?;
        Ok(deployed_address_create2(
            sender,
            salt,
            bytecode_hash,
            constructor,
        ))
    }

    /// Extracts the address of the deployed contract from the receipt logs.
    pub fn extract_contract_address(&self, logs: &[Log]) -> Result<Address, ClientError> {
        Ok(extract_deployed_address(logs)?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use zksync_types::{
        conversions::address_to_h256, ethabi::ParamType, event::DEPLOY_EVENT_SIGNATURE,
        InvalidBytecodeError, TransactionError,
    };

    use super::*;

    fn sender() -> Address {
        "0x36615Cf349d7F6344891B1e7CA7C72883F5dc049"
            .parse()
            .unwrap()
    }

    #[test]
    fn deployer_selectors() {
        let deployer = ContractDeployer::new();
        let create = deployer.encode_create(&[0; 32], &[], None).unwrap();
        assert_eq!(hex::encode(&create[..4]), "9c4d535b");
        let create2 = deployer
            .encode_create2(&[0; 32], &[], H256::zero())
            .unwrap();
        assert_eq!(hex::encode(&create2[..4]), "3cda3351");

        let event = deployer.abi().event("ContractDeployed").unwrap();
        assert_eq!(event.signature(), *DEPLOY_EVENT_SIGNATURE);
    }

    #[test]
    fn encoding_create2_call() {
        let deployer = ContractDeployer::new();
        let salt = H256::repeat_byte(0x5a);
        let bytecode = vec![0xab; 96];
        let call_data = vec![1, 2, 3];
        let encoded = deployer.encode_create2(&bytecode, &call_data, salt).unwrap();

        let tokens = deployer
            .abi()
            .function("create2")
            .unwrap()
            .decode_input(&encoded[4..])
            .unwrap();
        assert_eq!(
            tokens,
            [
                Token::FixedBytes(salt.as_bytes().to_vec()),
                Token::FixedBytes(
                    BytecodeHash::for_bytecode(&bytecode)
                        .unwrap()
                        .value()
                        .as_bytes()
                        .to_vec()
                ),
                Token::Bytes(call_data),
            ]
        );
        assert_eq!(
            encoded[..4],
            zksync_types::ethabi::short_signature(
                "create2",
                &[
                    ParamType::FixedBytes(32),
                    ParamType::FixedBytes(32),
                    ParamType::Bytes
                ]
            )
        );
    }

    #[test]
    fn create_salt_defaults_to_zero() {
        let deployer = ContractDeployer::new();
        assert_eq!(
            deployer.encode_create(&[0; 32], &[], None).unwrap(),
            deployer
                .encode_create(&[0; 32], &[], Some(H256::zero()))
                .unwrap()
        );
    }

    #[test]
    fn computing_addresses() {
        let deployer = ContractDeployer::default();
        assert_eq!(deployer.address(), CONTRACT_DEPLOYER_ADDRESS);
        assert_eq!(
            deployer.compute_l2_create_address(sender(), U256::zero()),
            "0x111c3e89ce80e62ee88318c2804920d4c96f92bb".parse().unwrap()
        );
        assert_eq!(
            deployer
                .compute_l2_create2_address(sender(), &[], &[], H256::zero())
                .unwrap(),
            "0x699a03a2041051f16cc69d9d9bb88d0b943b2bf6".parse().unwrap()
        );
    }

    #[test]
    fn overlong_bytecode_is_rejected() {
        let deployer = ContractDeployer::new();
        // One word past the 16-bit length field of the bytecode hash.
        let bytecode = vec![0; 65_537 * 32];
        assert_matches!(
            deployer.compute_l2_create2_address(sender(), &bytecode, &[], H256::zero()),
            Err(ClientError::InvalidBytecode(
                InvalidBytecodeError::BytecodeTooLong(len, _)
            )) if len == bytecode.len()
        );
        assert_matches!(
            deployer.encode_create2(&bytecode, &[], H256::zero()),
            Err(ClientError::InvalidBytecode(
                InvalidBytecodeError::BytecodeTooLong(..)
            ))
        );
        assert_matches!(
            deployer.encode_create(&bytecode, &[], None),
            Err(ClientError::InvalidBytecode(_))
        );
    }

    #[test]
    fn extracting_contract_address() {
        let deployer = ContractDeployer::new();
        assert_matches!(
            deployer.extract_contract_address(&[]),
            Err(ClientError::Transaction(TransactionError::AddressNotFound))
        );

        let contract_address = Address::repeat_byte(0x42);
        let log = Log {
            address: CONTRACT_DEPLOYER_ADDRESS,
            topics: vec![
                *DEPLOY_EVENT_SIGNATURE,
                address_to_h256(&sender()),
                H256::repeat_byte(1),
                address_to_h256(&contract_address),
            ],
            ..Log::default()
        };
        assert_eq!(
            deployer.extract_contract_address(&[log]).unwrap(),
            contract_address
        );
    }
}
