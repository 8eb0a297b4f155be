//! The declaration of the most primitive types used in ZKsync transactions.
//!
//! Fixed-width hashes and integers are re-exported from the `ethabi` crate.

#[macro_use]
mod macros;

pub mod conversions;
pub mod web3;

use std::{
    fmt,
    num::ParseIntError,
    ops::Deref,
    str::FromStr,
};

pub use ethabi::{
    self,
    ethereum_types::{Address, BigEndianHash, H160, H256, U256, U64},
};
use serde::{Deserialize, Serialize};

use crate::conversions::ConversionError;

basic_type!(
    /// ZKsync account nonce (number of transactions initiated by the account).
    Nonce,
    u64
);

basic_type!(
    /// ChainId in the ZKsync network.
    L2ChainId,
    u64
);

impl L2ChainId {
    /// Chain id of a locally deployed ZKsync network.
    pub const LOCALHOST: Self = Self(270);
}
