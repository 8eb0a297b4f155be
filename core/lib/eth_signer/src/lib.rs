use zksync_types::{
    Address, EIP712TypedStructure, Eip712Domain, PackedEthSignature, ReadyTransaction,
    SignedTransaction, TransactionError, H256,
};

pub use crate::pk_signer::PrivateKeySigner;

mod pk_signer;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SignerError {
    #[error("invalid private key")]
    InvalidKey,
    #[error("Signing failed: {0}")]
    SigningFailed(String),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// Produces signatures on behalf of a single account. Signing never mutates the signed data.
pub trait EthereumSigner: 'static + Send + Sync + Clone {
    fn address(&self) -> Result<Address, SignerError>;

    /// Signs a 32-byte digest as is, without any prefixes.
    fn sign_hash(&self, hash: &H256) -> Result<PackedEthSignature, SignerError>;

    fn sign_typed_data<S: EIP712TypedStructure>(
        &self,
        domain: &Eip712Domain,
        typed_struct: &S,
    ) -> Result<PackedEthSignature, SignerError> {
        let signed_bytes = PackedEthSignature::typed_data_to_signed_bytes(domain, typed_struct);
        self.sign_hash(&signed_bytes)
    }

    /// Signs a transaction and attaches the signature to it.
    fn sign_transaction(&self, tx: ReadyTransaction) -> Result<SignedTransaction, SignerError> {
        let signature = self.sign_hash(&tx.signing_hash())?;
        Ok(tx.with_signature(signature)?)
    }
}
