//! Proved-transaction to call-batch binding, end to end.

use num_bigint::BigUint;
use obscura_note::TransactNote;
use obscura_relay::{ContractCall, ProvedTransaction, build_action_data, compute_adapt_params};

#[test]
fn note_nullifiers_bind_the_call_batch() {
    // nullifiers as the note model derives them
    let nullifying_key = [0x09u8; 32];
    let transactions = vec![ProvedTransaction {
        nullifiers: vec![
            TransactNote::nullifier(&nullifying_key, 0),
            TransactNote::nullifier(&nullifying_key, 1),
        ],
    }];

    let calls = vec![
        ContractCall::new([0xaa; 20], vec![0x01, 0x02], None),
        ContractCall::new([0xbb; 20], vec![0x03, 0x04], Some(BigUint::from(7u8))),
    ];
    let action = build_action_data(&[0x5c; 31], true, calls, BigUint::from(1_200_000u32)).unwrap();

    let params = compute_adapt_params(&transactions, &action);

    // spending a different note position yields different nullifiers and a
    // different binding hash
    let other = vec![ProvedTransaction {
        nullifiers: vec![
            TransactNote::nullifier(&nullifying_key, 0),
            TransactNote::nullifier(&nullifying_key, 2),
        ],
    }];
    assert_ne!(compute_adapt_params(&other, &action), params);

    // identical inputs always reproduce the proved hash
    assert_eq!(compute_adapt_params(&transactions, &action), params);
}
