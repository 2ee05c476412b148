//! XChaCha20 and XChaCha20-Poly1305.
//!
//! The serialized nonce is 16 random bytes; the cipher's 24-byte nonce is
//! the first 24 bytes of SHA-256 over that value. Keeping the wire nonce
//! compact while meeting the extended-nonce size requirement is part of
//! the wire contract — both sides must apply the same extension.

use chacha20::XChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::{CipherError, XChaChaAlgorithm, XChaChaCiphertext, split_blocks};

/// Derive the 24-byte cipher nonce from the 16-byte wire nonce.
fn extend_nonce(nonce: &[u8; 16]) -> [u8; 24] {
    let digest = Sha256::digest(nonce);
    let mut extended = [0u8; 24];
    extended.copy_from_slice(&digest[..24]);
    extended
}

fn random_nonce() -> [u8; 16] {
    let mut nonce = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

/// Encrypt plaintext blocks with plain XChaCha20. No integrity check.
pub fn encrypt(blocks: &[Vec<u8>], key: &[u8]) -> Result<XChaChaCiphertext, CipherError> {
    let nonce = random_nonce();
    let extended = extend_nonce(&nonce);

    let mut buffer = obscura_bytes::combine(blocks);
    let mut cipher =
        XChaCha20::new_from_slices(key, &extended).map_err(|_| CipherError::InvalidKeyLength)?;
    cipher.apply_keystream(&mut buffer);

    let lengths: Vec<usize> = blocks.iter().map(Vec::len).collect();
    Ok(XChaChaCiphertext {
        algorithm: XChaChaAlgorithm::XChaCha20,
        nonce,
        bundle: split_blocks(&buffer, &lengths)?,
    })
}

/// Decrypt plain XChaCha20.
pub fn decrypt(ciphertext: &XChaChaCiphertext, key: &[u8]) -> Result<Vec<Vec<u8>>, CipherError> {
    if ciphertext.algorithm != XChaChaAlgorithm::XChaCha20 {
        return Err(CipherError::MalformedCiphertext);
    }
    let extended = extend_nonce(&ciphertext.nonce);

    let mut buffer = obscura_bytes::combine(&ciphertext.bundle);
    let mut cipher =
        XChaCha20::new_from_slices(key, &extended).map_err(|_| CipherError::InvalidKeyLength)?;
    cipher.apply_keystream(&mut buffer);

    let lengths: Vec<usize> = ciphertext.bundle.iter().map(Vec::len).collect();
    split_blocks(&buffer, &lengths)
}

/// Encrypt with XChaCha20-Poly1305. The 16-byte tag is appended to the
/// bundle as its final entry.
pub fn encrypt_poly1305(blocks: &[Vec<u8>], key: &[u8]) -> Result<XChaChaCiphertext, CipherError> {
    let cipher =
        XChaCha20Poly1305::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)?;

    let nonce = random_nonce();
    let extended = extend_nonce(&nonce);

    let plaintext = obscura_bytes::combine(blocks);
    let sealed = cipher
        .encrypt(XNonce::from_slice(&extended), plaintext.as_slice())
        .map_err(|_| CipherError::EncryptionFailed)?;

    let split = sealed.len() - 16;
    let (data, tag) = sealed.split_at(split);

    let lengths: Vec<usize> = blocks.iter().map(Vec::len).collect();
    let mut bundle = split_blocks(data, &lengths)?;
    bundle.push(tag.to_vec());

    Ok(XChaChaCiphertext {
        algorithm: XChaChaAlgorithm::XChaCha20Poly1305,
        nonce,
        bundle,
    })
}

/// Decrypt XChaCha20-Poly1305, verifying the trailing tag.
pub fn decrypt_poly1305(
    ciphertext: &XChaChaCiphertext,
    key: &[u8],
) -> Result<Vec<Vec<u8>>, CipherError> {
    if ciphertext.algorithm != XChaChaAlgorithm::XChaCha20Poly1305 {
        return Err(CipherError::MalformedCiphertext);
    }
    let (tag, data) = ciphertext
        .bundle
        .split_last()
        .ok_or(CipherError::MalformedCiphertext)?;
    if tag.len() != 16 {
        return Err(CipherError::MalformedCiphertext);
    }

    let cipher =
        XChaCha20Poly1305::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)?;
    let extended = extend_nonce(&ciphertext.nonce);

    let mut sealed = obscura_bytes::combine(data);
    sealed.extend_from_slice(tag);

    let plaintext = cipher
        .decrypt(XNonce::from_slice(&extended), sealed.as_slice())
        .map_err(|_| CipherError::AuthenticationFailed)?;

    let lengths: Vec<usize> = data.iter().map(Vec::len).collect();
    split_blocks(&plaintext, &lengths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> [u8; 32] {
        [3u8; 32]
    }

    #[test]
    fn nonce_extension_is_deterministic() {
        let nonce = [0x11u8; 16];
        assert_eq!(extend_nonce(&nonce), extend_nonce(&nonce));
        assert_ne!(extend_nonce(&nonce), extend_nonce(&[0x12u8; 16]));
    }

    #[test]
    fn plain_round_trip() {
        let blocks = vec![vec![1u8; 32], vec![2u8; 48]];
        let ct = encrypt(&blocks, &key()).unwrap();
        assert_eq!(ct.algorithm, XChaChaAlgorithm::XChaCha20);
        assert_eq!(decrypt(&ct, &key()).unwrap(), blocks);
    }

    #[test]
    fn poly1305_round_trip() {
        let blocks = vec![vec![1u8; 32], vec![2u8; 32]];
        let ct = encrypt_poly1305(&blocks, &key()).unwrap();

        // tag rides as the final bundle entry
        assert_eq!(ct.bundle.len(), 3);
        assert_eq!(ct.bundle[2].len(), 16);

        assert_eq!(decrypt_poly1305(&ct, &key()).unwrap(), blocks);
    }

    #[test]
    fn poly1305_tamper_is_authentication_failure() {
        let blocks = vec![vec![5u8; 32]];
        let ct = encrypt_poly1305(&blocks, &key()).unwrap();

        for bit in 0..8 {
            let mut tampered = ct.clone();
            let last = tampered.bundle.len() - 1;
            tampered.bundle[last][3] ^= 1 << bit;
            assert_eq!(
                decrypt_poly1305(&tampered, &key()),
                Err(CipherError::AuthenticationFailed)
            );
        }
    }

    #[test]
    fn algorithm_mismatch_is_malformed() {
        let ct = encrypt(&[vec![1u8; 16]], &key()).unwrap();
        assert_eq!(
            decrypt_poly1305(&ct, &key()),
            Err(CipherError::MalformedCiphertext)
        );
    }
}
