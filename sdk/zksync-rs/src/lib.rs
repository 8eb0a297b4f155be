//! SDK for building, signing and serializing ZKsync transactions.

pub use zksync_config::TransactionConfig;
pub use zksync_eth_signer::{self as signer, EthereumSigner, PrivateKeySigner};
pub use zksync_types::{self as types, ethabi};

pub use crate::{
    deployer::ContractDeployer,
    error::ClientError,
    operations::{Transaction712, TxCreate2Contract, TxCreateContract, TxFunctionCall, TxParams},
    signing::sign_and_encode,
};

pub mod deployer;
pub mod error;
pub mod operations;
pub mod signing;
pub mod utils;
