use num::BigUint;
pub use zksync_eth_signer::SignerError;
use zksync_types::{ethabi, InvalidBytecodeError, TransactionError};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error("Signing error: {0}")]
    SigningError(SignerError),
    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(#[from] InvalidBytecodeError),
    #[error("ABI encoding error: {0}")]
    Abi(#[from] ethabi::Error),
    #[error("Value {0} does not fit into 256 bits")]
    IntegerOverflow(BigUint),
}

impl From<SignerError> for ClientError {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::InvalidKey => Self::Transaction(TransactionError::InvalidKey),
            SignerError::Transaction(err) => Self::Transaction(err),
            err => Self::SigningError(err),
        }
    }
}
