//! Extraction of deployed contract addresses from receipt logs.

use once_cell::sync::Lazy;
use tracing::warn;

use crate::{
    conversions::{address_to_h256, h256_to_address},
    ethabi,
    transaction_request::TransactionError,
    web3::Log,
    Address, CONTRACT_DEPLOYER_ADDRESS, H256,
};


/// Signature of the event emitted by the contract deployer:
/// `ContractDeployed(address indexed deployerAddress, bytes32 indexed bytecodeHash, address indexed contractAddress)`.
pub static DEPLOY_EVENT_SIGNATURE: Lazy<H256> = Lazy::new(|| {
    ethabi::long_signature(
        "ContractDeployed",
        &[
            ethabi::ParamType::Address,
            ethabi::ParamType::FixedBytes(32),
            ethabi::ParamType::Address,
        ],
    )
});

/// Decoded `ContractDeployed` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractDeployedEvent {
    pub deployer: Address,
    pub bytecode_hash: H256,
    pub contract_address: Address,
}

impl ContractDeployedEvent {
    /// Parses a log entry, returning `None` if it is not a deployment event.
    pub fn from_log(log: &Log) -> Option<Self> {
        let is_contract_deployed = log.address == CONTRACT_DEPLOYER_ADDRESS
            && log.topics.len() == 4
            && log.topics[0] == *DEPLOY_EVENT_SIGNATURE;
        is_contract_deployed.then(|| Self {
            deployer: h256_to_address(&log.topics[1]),
            bytecode_hash: log.topics[2],
            contract_address: h256_to_address(&log.topics[3]),
        })
    }
}

/// Returns all deployment events in the order of emission.
pub fn extract_deploy_events(logs: &[Log]) -> Vec<ContractDeployedEvent> {
    logs.iter()
        .filter_map(ContractDeployedEvent::from_log)
        .collect()
}

/// Extracts the address of the contract deployed by a transaction.
///
/// Contracts created from a constructor emit their events before the outer contract, so if there
/// are several deployment events, the last one is returned.
pub fn extract_deployed_address(logs: &[Log]) -> Result<Address, TransactionError> {
    let events = extract_deploy_events(logs);
    if events.len() > 1 {
        warn!(
            count = events.len(),
            "several contracts deployed by transaction; returning the last one"
        );
    }
    events
        .last()
        .map(|event| event.contract_address)
        .ok_or(TransactionError::AddressNotFound)
}

/// Same as [`extract_deployed_address()`], but only considers contracts deployed by `deployer`.
pub fn extract_deployed_address_for(
    logs: &[Log],
    deployer: Address,
) -> Result<Address, TransactionError> {
    let deployer_topic = address_to_h256(&deployer);
    logs.iter()
        .filter(|log| log.topics.get(1) == Some(&deployer_topic))
        .filter_map(ContractDeployedEvent::from_log)
        .last()
        .map(|event| event.contract_address)
        .ok_or(TransactionError::AddressNotFound)
}
