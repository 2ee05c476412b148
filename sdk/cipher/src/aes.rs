//! AES-256 block encryption (GCM and CTR modes).
//!
//! GCM carries a 16-byte IV and a 16-byte tag computed over the
//! concatenation of all blocks in call order. CTR has no tag and is used
//! only for data whose integrity is verified elsewhere — inside a GCM
//! envelope or bound into an on-chain hash.

use crate::{CipherError, CtrCiphertext, GcmCiphertext, split_blocks};

/// AES-256-GCM with the protocol's 16-byte IV.
pub mod gcm {
    use aes_gcm::AesGcm;
    use aes_gcm::aead::consts::U16;
    use aes_gcm::aead::{Aead, KeyInit};
    use aes_gcm::aes::Aes256;
    use rand::RngCore;

    use super::*;

    type Aes256Gcm16 = AesGcm<Aes256, U16>;

    /// Encrypt plaintext blocks under a 32-byte key with a fresh random IV.
    pub fn encrypt(blocks: &[Vec<u8>], key: &[u8]) -> Result<GcmCiphertext, CipherError> {
        let cipher = Aes256Gcm16::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)?;

        let mut iv = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut iv);

        let plaintext = obscura_bytes::combine(blocks);
        let sealed = cipher
            .encrypt(aes_gcm::Nonce::from_slice(&iv), plaintext.as_slice())
            .map_err(|_| CipherError::EncryptionFailed)?;

        let split = sealed.len() - 16;
        let (data, tag) = sealed.split_at(split);

        let lengths: Vec<usize> = blocks.iter().map(Vec::len).collect();
        Ok(GcmCiphertext {
            iv,
            tag: tag.try_into().map_err(|_| CipherError::EncryptionFailed)?,
            data: split_blocks(data, &lengths)?,
        })
    }

    /// Decrypt, verifying the tag over the full block concatenation.
    ///
    /// A tag mismatch is [`CipherError::AuthenticationFailed`] — callers
    /// scanning ciphertexts use that kind as a "not mine" filter.
    pub fn decrypt(ciphertext: &GcmCiphertext, key: &[u8]) -> Result<Vec<Vec<u8>>, CipherError> {
        let cipher = Aes256Gcm16::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)?;

        let mut sealed = obscura_bytes::combine(&ciphertext.data);
        sealed.extend_from_slice(&ciphertext.tag);

        let plaintext = cipher
            .decrypt(aes_gcm::Nonce::from_slice(&ciphertext.iv), sealed.as_slice())
            .map_err(|_| CipherError::AuthenticationFailed)?;

        let lengths: Vec<usize> = ciphertext.data.iter().map(Vec::len).collect();
        split_blocks(&plaintext, &lengths)
    }
}

/// AES-256-CTR, unauthenticated.
pub mod ctr {
    use ::ctr::Ctr128BE;
    use ::ctr::cipher::{KeyIvInit, StreamCipher};
    use aes::Aes256;
    use rand::RngCore;

    use super::*;

    type Aes256Ctr = Ctr128BE<Aes256>;

    /// Encrypt plaintext blocks under a 32-byte key with a fresh random IV.
    pub fn encrypt(blocks: &[Vec<u8>], key: &[u8]) -> Result<CtrCiphertext, CipherError> {
        let mut iv = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut iv);

        let mut buffer = obscura_bytes::combine(blocks);
        let mut cipher =
            Aes256Ctr::new_from_slices(key, &iv).map_err(|_| CipherError::InvalidKeyLength)?;
        cipher.apply_keystream(&mut buffer);

        let lengths: Vec<usize> = blocks.iter().map(Vec::len).collect();
        Ok(CtrCiphertext {
            iv,
            data: split_blocks(&buffer, &lengths)?,
        })
    }

    /// Decrypt. No integrity check: garbage in, garbage out.
    pub fn decrypt(ciphertext: &CtrCiphertext, key: &[u8]) -> Result<Vec<Vec<u8>>, CipherError> {
        let mut buffer = obscura_bytes::combine(&ciphertext.data);
        let mut cipher = Aes256Ctr::new_from_slices(key, &ciphertext.iv)
            .map_err(|_| CipherError::InvalidKeyLength)?;
        cipher.apply_keystream(&mut buffer);

        let lengths: Vec<usize> = ciphertext.data.iter().map(Vec::len).collect();
        split_blocks(&buffer, &lengths)
    }
}
