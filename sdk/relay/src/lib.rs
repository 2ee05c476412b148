//! Obscura Relay-Adapt Binding
//!
//! Builds the tamper-binding hash over batched external calls that a
//! relaying party executes on a user's behalf:
//!
//! ```text
//! adaptParams = keccak256(abi.encode(
//!     bytes32[][] nullifiers,
//!     uint256     transactionCount,
//!     (bytes31 random, bool requireSuccess,
//!      uint256 minGasLimit, (address,bytes,uint256)[] calls)
//! ))
//! ```
//!
//! The hash is embedded in the zero-knowledge proof before execution, so
//! substituting, reordering, or adding/removing calls afterwards is
//! detected by the on-chain verifier. The sibling delegation authorization
//! shares the same hash-then-sign-a-canonical-encoding pattern.

pub mod abi;
pub mod adapt;
pub mod delegate;
pub mod rlp;

pub use abi::Token;
pub use adapt::{ActionData, ContractCall, ProvedTransaction, build_action_data,
    compute_adapt_params};
pub use delegate::{DelegationAuthorization, authorization_hash, sign_delegation_authorization};

use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Relay-adapt errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("invalid random length: expected {expected} bytes, got {got}")]
    InvalidRandomLength { expected: usize, got: usize },

    #[error("signing failed")]
    SigningFailed,
}

/// keccak256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_known_vector() {
        // keccak256("") is a well-known constant
        assert_eq!(
            obscura_bytes::bytes_to_hex(&keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
