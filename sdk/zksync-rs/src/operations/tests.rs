use assert_matches::assert_matches;
use test_casing::test_casing;
use zksync_types::{TransactionError, CONTRACT_DEPLOYER_ADDRESS, H256};

use super::*;
use crate::{deployer::ContractDeployer, utils::get_general_paymaster_input};

fn params() -> TxParams {
    TxParams::new(
        L2ChainId::LOCALHOST,
        Nonce(3),
        Address::repeat_byte(0x01),
        250_000_000.into(),
    )
}

#[test]
fn function_call_is_estimated_before_signing() {
    let call = TxFunctionCall::new(&params(), Address::repeat_byte(0x11), 10.into(), vec![1, 2])
        .unwrap();
    assert_eq!(call.tx().gas_limit(), 0);
    assert_eq!(call.tx().effective_priority_fee(), 250_000_000.into());

    let request = serde_json::to_value(call.estimation_request()).unwrap();
    assert!(request.get("gas").is_none(), "{request}");
    assert_eq!(request["eip712Meta"]["gasPerPubdata"], "0xc350");
    assert_eq!(request["type"], "0x71");

    assert_matches!(
        call.tx712(0),
        Err(ClientError::Transaction(
            TransactionError::IncompleteTransaction("gas_limit")
        ))
    );
    let ready = call.tx712(100_000).unwrap();
    assert_eq!(ready.gas_limit(), 100_000);
    assert_eq!(ready.data(), [1, 2]);
    // The draft can be reused with another estimate.
    assert_eq!(call.tx712(200_000).unwrap().gas_limit(), 200_000);
}

#[test]
fn transfer_has_no_data() {
    let transfer = TxFunctionCall::transfer(&params(), Address::repeat_byte(0x11), 1.into()).unwrap();
    assert!(transfer.tx().data().is_empty());
    assert!(!transfer.tx().is_deployment());
}

#[test]
fn config_is_applied() {
    let config = TransactionConfig {
        gas_per_pubdata_limit: 800,
        default_max_priority_fee_per_gas: Some(1_000),
        max_encoded_tx_size: 1 << 20,
    };
    let params = params().with_config(config);
    let call = TxFunctionCall::transfer(&params, Address::repeat_byte(0x11), 1.into()).unwrap();
    assert_eq!(call.tx().gas_per_pubdata_limit(), 800.into());
    assert_eq!(call.tx().effective_priority_fee(), 1_000.into());
    assert_eq!(call.tx().max_encoded_size(), 1 << 20);

    let params = params.max_priority_fee_per_gas(5.into()).gas_limit(21_000);
    let call = TxFunctionCall::transfer(&params, Address::repeat_byte(0x11), 1.into()).unwrap();
    assert_eq!(call.tx().effective_priority_fee(), 5.into());
    assert!(call.estimation_request().gas.is_some());
}

#[test]
fn paymaster_params_are_propagated() {
    let paymaster_params = get_general_paymaster_input(Address::repeat_byte(0x77), vec![]).unwrap();
    let params = params().paymaster_params(paymaster_params.clone());
    let call = TxFunctionCall::transfer(&params, Address::repeat_byte(0x11), 1.into()).unwrap();
    assert_eq!(call.tx().paymaster_params(), Some(&paymaster_params));
    assert_eq!(
        call.estimation_request().eip712_meta.unwrap().paymaster_params,
        Some(paymaster_params)
    );
}

#[test_casing(2, [false, true])]
#[test]
fn deployment_goes_through_deployer(use_create2: bool) {
    let bytecode = vec![0xab; 96];
    let dependency = vec![0; 32];
    let salt = H256::repeat_byte(0x42);
    let deployer = ContractDeployer::new();
    let (tx, expected_data) = if use_create2 {
        let create2 = TxCreate2Contract::new(
            &params(),
            bytecode.clone(),
            vec![],
            vec![dependency.clone()],
            salt,
        )
        .unwrap();
        let data = deployer.encode_create2(&bytecode, &[], salt).unwrap();
        (create2.tx().clone(), data)
    } else {
        let create = TxCreateContract::new(
            &params(),
            bytecode.clone(),
            vec![],
            vec![dependency.clone()],
            None,
        )
        .unwrap();
        let data = deployer.encode_create(&bytecode, &[], None).unwrap();
        (create.tx().clone(), data)
    };

    assert_eq!(tx.to(), CONTRACT_DEPLOYER_ADDRESS);
    assert!(tx.is_deployment());
    assert_eq!(tx.factory_deps(), [dependency, bytecode]);
    assert_eq!(tx.data(), expected_data);
}

#[test]
fn create2_contract_knows_its_address() {
    let bytecode = vec![0xab; 96];
    let salt = H256::repeat_byte(0x42);
    let call_data = vec![0; 32];
    let create2 =
        TxCreate2Contract::new(&params(), bytecode.clone(), call_data.clone(), vec![], salt)
            .unwrap();

    let deployer = ContractDeployer::new();
    assert_eq!(
        create2.contract_address(),
        deployer
            .compute_l2_create2_address(params().from(), &bytecode, &call_data, salt)
            .unwrap()
    );
    assert_eq!(
        create2.tx().data(),
        deployer.encode_create2(&bytecode, &call_data, salt).unwrap()
    );
    assert_eq!(create2.tx().factory_deps(), [bytecode]);
}

#[test]
fn invalid_bytecode_is_rejected() {
    let err = TxCreate2Contract::new(&params(), vec![0; 31], vec![], vec![], H256::zero())
        .unwrap_err();
    assert_matches!(
        err,
        ClientError::Transaction(TransactionError::InvalidFactoryDependency(0, _))
    );
}
