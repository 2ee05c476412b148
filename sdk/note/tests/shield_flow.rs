//! End-to-end shield flow: construct, encrypt for a receiver, recover.

use obscura_cipher::keys;
use obscura_note::{ShieldNote, TokenData};
use rand::RngCore;

fn random_scalar() -> [u8; 32] {
    let mut scalar = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut scalar);
    scalar
}

#[test]
fn shield_encrypt_and_receiver_recovers_random() {
    let master_public_key = [0x42u8; 32];
    let random = [0x1bu8; 16];
    let token = TokenData::erc20([0xabu8; 20]);
    let note = ShieldNote::new(master_public_key, random, 1000, token);

    let shield_private_key = random_scalar();
    let receiver_viewing_private_key = random_scalar();
    let receiver_viewing_public_key = keys::public_key(&receiver_viewing_private_key);

    let ciphertext = note
        .serialize(&shield_private_key, &receiver_viewing_public_key)
        .unwrap();

    // exactly 3 bundle words + 1 shield key
    assert_eq!(ciphertext.encrypted_bundle.len(), 3);

    // receiver derives the same shared key from the bundle's shield key
    let shared = keys::derive_shared_key(&receiver_viewing_private_key, &ciphertext.shield_key)
        .expect("valid shield key");
    let recovered = ShieldNote::decrypt_random(&ciphertext.encrypted_bundle, &shared).unwrap();
    assert_eq!(recovered, random);
}

#[test]
fn shielder_recovers_receiver_viewing_key() {
    let token = TokenData::erc20([0xabu8; 20]);
    let note = ShieldNote::new([0x42u8; 32], [0x1bu8; 16], 1000, token);

    let shield_private_key = random_scalar();
    let receiver_viewing_public_key = keys::public_key(&random_scalar());

    let ciphertext = note
        .serialize(&shield_private_key, &receiver_viewing_public_key)
        .unwrap();

    let recovered = ShieldNote::decrypt_receiver_viewing_key(
        &ciphertext.encrypted_bundle,
        &shield_private_key,
    )
    .unwrap();
    assert_eq!(recovered, receiver_viewing_public_key);
}

#[test]
fn wrong_receiver_cannot_recover_random() {
    let token = TokenData::erc20([0xabu8; 20]);
    let note = ShieldNote::new([0x42u8; 32], [0x1bu8; 16], 1000, token);

    let shield_private_key = random_scalar();
    let receiver_viewing_public_key = keys::public_key(&random_scalar());

    let ciphertext = note
        .serialize(&shield_private_key, &receiver_viewing_public_key)
        .unwrap();

    // an unrelated party derives a different shared key and fails the tag
    let eavesdropper = random_scalar();
    let wrong_shared =
        keys::derive_shared_key(&eavesdropper, &ciphertext.shield_key).expect("valid shield key");
    let result = ShieldNote::decrypt_random(&ciphertext.encrypted_bundle, &wrong_shared);
    assert!(result.unwrap_err().is_no_match());
}

#[test]
fn low_order_receiver_key_is_rejected() {
    let token = TokenData::erc20([0xabu8; 20]);
    let note = ShieldNote::new([0x42u8; 32], [0x1bu8; 16], 1000, token);

    let result = note.serialize(&random_scalar(), &[0u8; 32]);
    assert!(matches!(
        result,
        Err(obscura_note::NoteError::InvalidPeerKey)
    ));
}
