//! Blinded commitments.
//!
//! Privacy-preserving identifiers binding a commitment to its
//! creator/spender context, consumed by an external allow-list verifier.
//! Each is a Poseidon hash over three 256-bit inputs; argument order is
//! part of the contract. This core only computes them.

use ark_bn254::Fr;

use crate::poseidon::{field_from_bytes, poseidon_bytes};

fn blinded(a: Fr, b: Fr, c: Fr) -> String {
    obscura_bytes::bytes_to_prefixed_hex(&poseidon_bytes(&[a, b, c]))
}

/// Blinded identifier for a shield commitment at a global tree position.
pub fn for_shield(
    commitment_hash: &[u8; 32],
    note_public_key: &[u8; 32],
    global_tree_position: u64,
) -> String {
    blinded(
        field_from_bytes(commitment_hash),
        field_from_bytes(note_public_key),
        global_tree_position.into(),
    )
}

/// Blinded identifier for a transact commitment within a transaction.
pub fn for_transact(
    commitment_hash: &[u8; 32],
    note_public_key: &[u8; 32],
    transaction_id: &[u8; 32],
) -> String {
    blinded(
        field_from_bytes(commitment_hash),
        field_from_bytes(note_public_key),
        field_from_bytes(transaction_id),
    )
}

/// Blinded identifier for an unshield to a public destination.
pub fn for_unshield(
    commitment_hash: &[u8; 32],
    destination_address: &[u8; 20],
    transaction_id: &[u8; 32],
) -> String {
    blinded(
        field_from_bytes(commitment_hash),
        field_from_bytes(destination_address),
        field_from_bytes(transaction_id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_and_prefixed() {
        let a = for_shield(&[1u8; 32], &[2u8; 32], 3);
        let b = for_shield(&[1u8; 32], &[2u8; 32], 3);
        assert_eq!(a, b);
        assert!(a.starts_with("0x"));
        assert_eq!(a.len(), 2 + 64);
    }

    #[test]
    fn argument_order_matters() {
        let a = for_transact(&[1u8; 32], &[2u8; 32], &[3u8; 32]);
        let b = for_transact(&[2u8; 32], &[1u8; 32], &[3u8; 32]);
        assert_ne!(a, b);
    }

    #[test]
    fn context_changes_identifier() {
        let a = for_shield(&[1u8; 32], &[2u8; 32], 3);
        let b = for_shield(&[1u8; 32], &[2u8; 32], 4);
        assert_ne!(a, b);
    }
}
