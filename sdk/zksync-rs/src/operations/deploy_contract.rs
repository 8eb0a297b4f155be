use zksync_types::{Address, Eip712Transaction, H256};

use super::{Transaction712, TxParams};
use crate::{deployer::ContractDeployer, error::ClientError};

/// Deployment of a contract with `create`. The address depends on the sender's deployment nonce;
/// see [`ContractDeployer::compute_l2_create_address()`].
#[derive(Debug, Clone)]
pub struct TxCreateContract {
    tx: Eip712Transaction,
}

impl TxCreateContract {
    /// `call_data` is the ABI-encoded constructor input. `deps` are the bytecodes of contracts
    /// that the deployed one may create.
    pub fn new(
        params: &TxParams,
        bytecode: Vec<u8>,
        call_data: Vec<u8>,
        deps: Vec<Vec<u8>>,
        salt: Option<H256>,
    ) -> Result<Self, ClientError> {
        let deployer_call = ContractDeployer::new().encode_create(&bytecode, &call_data, salt)?;
        let tx = params
            .builder()
            .factory_deps(deps)
            .deployment(bytecode, deployer_call)
            .build()?;
        Ok(Self { tx })
    }
}

impl Transaction712 for TxCreateContract {
    fn tx(&self) -> &Eip712Transaction {
        &self.tx
    }
}

/// Deployment of a contract with `create2`, which has a deterministic address.
#[derive(Debug, Clone)]
pub struct TxCreate2Contract {
    tx: Eip712Transaction,
    contract_address: Address,
}

impl TxCreate2Contract {
    pub fn new(
        params: &TxParams,
        bytecode: Vec<u8>,
        call_data: Vec<u8>,
        deps: Vec<Vec<u8>>,
        salt: H256,
    ) -> Result<Self, ClientError> {
        let deployer = ContractDeployer::new();
        let contract_address =
            deployer.compute_l2_create2_address(params.from(), &bytecode, &call_data, salt)?;
        let deployer_call = deployer.encode_create2(&bytecode, &call_data, salt)?;
        let tx = params
            .builder()
            .factory_deps(deps)
            .deployment(bytecode, deployer_call)
            .build()?;
        Ok(Self {
            tx,
            contract_address,
        })
    }

    /// Address the contract will be deployed at.
    pub fn contract_address(&self) -> Address {
        self.contract_address
    }
}

impl Transaction712 for TxCreate2Contract {
    fn tx(&self) -> &Eip712Transaction {
        &self.tx
    }
}
