//! Unshield notes: moving value back to public form.
//!
//! The destination is public, so there is nothing to encrypt — only the
//! commitment hash and the protocol fee split matter here.

use serde::{Deserialize, Serialize};

use crate::poseidon::{field_from_bytes, poseidon_bytes};
use crate::token::TokenData;

/// Basis-point denominator for the unshield fee.
const BASIS_POINTS: u128 = 10_000;

/// The amount/fee split of an unshield value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnshieldFee {
    pub amount: u128,
    pub fee: u128,
}

/// A note leaving the shielded pool for a public address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnshieldNote {
    pub to_address: [u8; 20],
    pub value: u128,
    pub token: TokenData,
}

impl UnshieldNote {
    pub fn new(to_address: [u8; 20], value: u128, token: TokenData) -> Self {
        Self {
            to_address,
            value,
            token,
        }
    }

    /// Commitment hash: `Poseidon(toAddress, tokenDataHash, value)`.
    pub fn hash(&self) -> [u8; 32] {
        poseidon_bytes(&[
            field_from_bytes(&self.to_address),
            field_from_bytes(&self.token.hash()),
            self.value.into(),
        ])
    }
}

/// Split a gross value into net amount and protocol fee.
///
/// `fee = floor(value * feeBasisPoints / 10000)`. Small values where the
/// nominal fee rounds to zero pay no fee — a boundary policy, not an
/// error.
pub fn amount_and_fee(value: u128, fee_basis_points: u16) -> UnshieldFee {
    // split quotient/remainder so value * bps cannot overflow u128
    let bps = fee_basis_points as u128;
    let fee = (value / BASIS_POINTS) * bps + (value % BASIS_POINTS) * bps / BASIS_POINTS;
    UnshieldFee {
        amount: value - fee,
        fee,
    }
}
