//! End-to-end flows: building, estimating, signing, serializing and parsing transactions.

use zksync::{
    sign_and_encode,
    types::{
        conversions::address_to_h256, event::DEPLOY_EVENT_SIGNATURE, web3::Log, L2ChainId, Nonce,
        Address, BytecodeHash, SignedTransaction, CONTRACT_DEPLOYER_ADDRESS, EIP_712_TX_TYPE, H256,
        U256,
    },
    utils::get_general_paymaster_input,
    ContractDeployer, EthereumSigner, PrivateKeySigner, Transaction712, TxCreate2Contract,
    TxFunctionCall, TxParams,
};
use zksync_config::ObservabilityConfig;

fn signer() -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(H256::from_low_u64_be(1)).unwrap()
}

fn params(signer: &PrivateKeySigner, nonce: u64) -> TxParams {
    TxParams::new(
        L2ChainId::LOCALHOST,
        Nonce(nonce),
        signer.address().unwrap(),
        250_000_000.into(),
    )
}

#[test]
fn transfer_round_trip() -> anyhow::Result<()> {
    let _guard = ObservabilityConfig {
        log_format: "json".to_owned(),
        log_directives: Some("zksync_types=debug,info".to_owned()),
    }
    .install()?;

    let signer = signer();
    let call = TxFunctionCall::transfer(
        &params(&signer, 0),
        "0x36615Cf349d7F6344891B1e7CA7C72883F5dc049".parse()?,
        U256::exp10(16),
    )?;
    let ready = call.tx712(150_000)?;
    let (bytes, tx_hash) = sign_and_encode(&signer, ready.clone())?;
    assert_eq!(bytes[0], EIP_712_TX_TYPE);

    let decoded = SignedTransaction::from_bytes(&bytes)?;
    assert_eq!(*decoded.transaction(), ready);
    assert_eq!(decoded.recover_signer()?, signer.address()?);
    assert_eq!(decoded.tx_hash(), tx_hash);
    assert_eq!(decoded.encode()?, bytes);
    Ok(())
}

#[test]
fn paymaster_transfer_round_trip() -> anyhow::Result<()> {
    let signer = signer();
    let paymaster_params = get_general_paymaster_input(Address::repeat_byte(0x77), vec![])?;
    let params = params(&signer, 5).paymaster_params(paymaster_params.clone());
    let call = TxFunctionCall::new(&params, signer.address()?, U256::zero(), vec![0xde, 0xad])?;
    let (bytes, _) = sign_and_encode(&signer, call.tx712(1_000_000)?)?;

    let decoded = SignedTransaction::from_bytes(&bytes)?;
    assert_eq!(decoded.transaction().paymaster_params(), Some(&paymaster_params));
    assert_eq!(decoded.transaction().nonce(), Nonce(5));
    Ok(())
}

#[test]
fn create2_deployment_flow() -> anyhow::Result<()> {
    let signer = signer();
    let bytecode = vec![0xab; 96];
    let salt = H256::repeat_byte(0x5a);
    let deploy = TxCreate2Contract::new(&params(&signer, 1), bytecode.clone(), vec![], vec![], salt)?;

    let request = serde_json::to_value(deploy.estimation_request())?;
    assert_eq!(request["to"], format!("{CONTRACT_DEPLOYER_ADDRESS:?}"));
    assert!(request.get("gas").is_none());

    let (bytes, _) = sign_and_encode(&signer, deploy.tx712(2_000_000)?)?;
    let decoded = SignedTransaction::from_bytes(&bytes)?;
    assert_eq!(decoded.transaction().factory_deps(), [bytecode.clone()]);

    // Simulate the receipt of the transaction.
    let deployer = ContractDeployer::new();
    let expected_address = deploy.contract_address();
    let log = Log {
        address: CONTRACT_DEPLOYER_ADDRESS,
        topics: vec![
            *DEPLOY_EVENT_SIGNATURE,
            address_to_h256(&signer.address()?),
            BytecodeHash::for_bytecode(&bytecode)?.value(),
            address_to_h256(&expected_address),
        ],
        ..Log::default()
    };
    assert_eq!(deployer.extract_contract_address(&[log])?, expected_address);
    assert_eq!(
        expected_address,
        deployer.compute_l2_create2_address(signer.address()?, &bytecode, &[], salt)?
    );
    Ok(())
}
