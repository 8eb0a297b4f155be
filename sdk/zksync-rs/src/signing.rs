use tracing::debug;
use zksync_eth_signer::EthereumSigner;
use zksync_types::{ReadyTransaction, H256};

use crate::error::ClientError;

/// Signs a transaction and serializes it for `eth_sendRawTransaction`.
///
/// Returns the raw transaction bytes together with the transaction hash the node will report.
pub fn sign_and_encode<S: EthereumSigner>(
    signer: &S,
    tx: ReadyTransaction,
) -> Result<(Vec<u8>, H256), ClientError> {
    let signed = signer.sign_transaction(tx)?;
    let bytes = signed.encode()?;
    let tx_hash = signed.tx_hash();
    debug!(%tx_hash, len = bytes.len(), "signed and encoded transaction");
    Ok((bytes, tx_hash))
}
