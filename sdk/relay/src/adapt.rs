//! Action data and the adapt-params binding hash.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::abi::{self, Token};
use crate::{RelayError, keccak256};

/// Byte length of the action-data random field.
pub const ACTION_RANDOM_LEN: usize = 31;

/// One external call the relay contract will execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCall {
    pub to: [u8; 20],
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
    pub value: BigUint,
}

impl ContractCall {
    /// Strip a call down to exactly `{to, data, value}`; a missing value
    /// defaults to zero.
    pub fn new(to: [u8; 20], data: Vec<u8>, value: Option<BigUint>) -> Self {
        Self {
            to,
            data,
            value: value.unwrap_or_default(),
        }
    }
}

/// The externally-executed call batch. `calls` ordering is meaningful and
/// part of the hash preimage — it is never sorted or normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    pub random: [u8; ACTION_RANDOM_LEN],
    pub require_success: bool,
    pub min_gas_limit: BigUint,
    pub calls: Vec<ContractCall>,
}

/// A proved transaction, reduced to the shape this binding consumes: its
/// ordered nullifier list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvedTransaction {
    pub nullifiers: Vec<[u8; 32]>,
}

/// Validate and assemble an [`ActionData`].
pub fn build_action_data(
    random: &[u8],
    require_success: bool,
    calls: Vec<ContractCall>,
    min_gas_limit: BigUint,
) -> Result<ActionData, RelayError> {
    let random: [u8; ACTION_RANDOM_LEN] =
        random
            .try_into()
            .map_err(|_| RelayError::InvalidRandomLength {
                expected: ACTION_RANDOM_LEN,
                got: random.len(),
            })?;

    Ok(ActionData {
        random,
        require_success,
        min_gas_limit,
        calls,
    })
}

fn action_data_token(action_data: &ActionData) -> Token {
    Token::Tuple(vec![
        Token::FixedBytes(action_data.random.to_vec()),
        Token::Bool(action_data.require_success),
        Token::Uint(action_data.min_gas_limit.clone()),
        Token::Array(
            action_data
                .calls
                .iter()
                .map(|call| {
                    Token::Tuple(vec![
                        Token::Address(call.to),
                        Token::Bytes(call.data.clone()),
                        Token::Uint(call.value.clone()),
                    ])
                })
                .collect(),
        ),
    ])
}

/// The binding hash between "what was proved" and "what will be executed".
///
/// Deterministic over its inputs; any change to call order, gas limit or
/// the require-success flag changes the hash, and the on-chain verifier
/// rejects the mismatch.
pub fn compute_adapt_params(
    transactions: &[ProvedTransaction],
    action_data: &ActionData,
) -> [u8; 32] {
    let nullifiers = Token::Array(
        transactions
            .iter()
            .map(|tx| {
                Token::Array(
                    tx.nullifiers
                        .iter()
                        .map(|n| Token::FixedBytes(n.to_vec()))
                        .collect(),
                )
            })
            .collect(),
    );

    let encoded = abi::encode(&[
        nullifiers,
        Token::Uint(BigUint::from(transactions.len())),
        action_data_token(action_data),
    ]);
    keccak256(&encoded)
}
