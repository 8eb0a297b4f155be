use std::fmt;

use tracing::debug;
use zksync_types::{Address, K256PrivateKey, PackedEthSignature, H256};

use crate::{EthereumSigner, SignerError};

/// Signer holding a private key in memory.
#[derive(Clone)]
pub struct PrivateKeySigner {
    private_key: K256PrivateKey,
}

impl fmt::Debug for PrivateKeySigner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PrivateKeySigner")
            .field("address", &self.private_key.address())
            .finish_non_exhaustive()
    }
}

impl PrivateKeySigner {
    pub fn new(private_key: K256PrivateKey) -> Self {
        Self { private_key }
    }

    pub fn from_bytes(private_key: H256) -> Result<Self, SignerError> {
        let private_key =
            K256PrivateKey::from_bytes(private_key).map_err(|_| SignerError::InvalidKey)?;
        Ok(Self::new(private_key))
    }
}

impl EthereumSigner for PrivateKeySigner {
    fn address(&self) -> Result<Address, SignerError> {
        Ok(self.private_key.address())
    }

    fn sign_hash(&self, hash: &H256) -> Result<PackedEthSignature, SignerError> {
        let signature = PackedEthSignature::sign_raw(&self.private_key, hash)
            .map_err(|err| SignerError::SigningFailed(err.to_string()))?;
        debug!(%hash, signer = %self.private_key.address(), "signed hash");
        Ok(signature)
    }
}
