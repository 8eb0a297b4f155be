use num::BigUint;
use once_cell::sync::Lazy;
use zksync_types::{
    ethabi::{Contract, Token},
    Address, PaymasterParams, U256,
};

use crate::error::ClientError;

const IPAYMASTER_FLOW_INTERFACE: &str = include_str!("./abi/IPaymasterFlow.json");

static PAYMASTER_FLOW: Lazy<Contract> = Lazy::new(|| load_contract(IPAYMASTER_FLOW_INTERFACE));

/// Converts `U256` into the corresponding `BigUint` value.
pub fn u256_to_biguint(value: U256) -> BigUint {
    let mut bytes = [0u8; 32];
    value.to_little_endian(&mut bytes);
    BigUint::from_bytes_le(&bytes)
}

/// Converts `BigUint` value into the corresponding `U256` value, failing if it doesn't fit.
pub fn biguint_to_u256_checked(value: BigUint) -> Result<U256, ClientError> {
    if value.bits() > 256 {
        return Err(ClientError::IntegerOverflow(value));
    }
    Ok(U256::from_little_endian(&value.to_bytes_le()))
}

/// Loads the ABI of a contract bundled with the crate. Panics on malformed input.
pub(crate) fn load_contract(raw_abi_string: &str) -> Contract {
    let abi_string = serde_json::from_str::<serde_json::Value>(raw_abi_string)
        .expect("Malformed contract abi file")
        .get("abi")
        .expect("Malformed contract abi file")
        .to_string();
    Contract::load(abi_string.as_bytes()).expect("Malformed contract abi file")
}

pub fn get_approval_based_paymaster_input(
    paymaster: Address,
    token_address: Address,
    min_allowance: U256,
    inner_input: Vec<u8>,
) -> Result<PaymasterParams, ClientError> {
    let paymaster_input = PAYMASTER_FLOW.function("approvalBased")?.encode_input(&[
        Token::Address(token_address),
        Token::Uint(min_allowance),
        Token::Bytes(inner_input),
    ])?;
    Ok(PaymasterParams {
        paymaster,
        paymaster_input,
    })
}

/// Paymaster params with placeholder allowance, suitable for gas estimation.
pub fn get_approval_based_paymaster_input_for_estimation(
    paymaster: Address,
    token_address: Address,
) -> Result<PaymasterParams, ClientError> {
    get_approval_based_paymaster_input(
        paymaster,
        token_address,
        Default::default(),
        Default::default(),
    )
}

pub fn get_general_paymaster_input(
    paymaster: Address,
    inner_input: Vec<u8>,
) -> Result<PaymasterParams, ClientError> {
    let paymaster_input = PAYMASTER_FLOW
        .function("general")?
        .encode_input(&[Token::Bytes(inner_input)])?;
    Ok(PaymasterParams {
        paymaster,
        paymaster_input,
    })
}
