//! Obscura Cipher Suite
//!
//! Three independent, stateless symmetric algorithms plus curve25519 key
//! agreement, operating on the byte codec's canonical forms:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  AES-256-GCM   — authenticated, one tag over all blocks      │
//! │  AES-256-CTR   — unauthenticated, integrity verified above   │
//! │  XChaCha20(-Poly1305) — 16-byte wire nonce, SHA-256 extended │
//! └──────────────────────────────────────────────────────────────┘
//!            ▲
//!            │ 32-byte symmetric key
//!   x25519 DH + HKDF-SHA256 (keys module)
//! ```
//!
//! Each call encrypts a list of plaintext blocks under one fresh IV/nonce;
//! block lengths and block order are preserved symmetrically, and for the
//! authenticated algorithms the tag covers the concatenation of all blocks
//! in call order.

pub mod aes;
pub mod chacha;
pub mod keys;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cipher suite errors.
///
/// `AuthenticationFailed` is deliberately its own kind: scan-decryption
/// treats it as "not addressed to me" and swallows it, while every other
/// kind surfaces as corruption or a caller bug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("key must be exactly 32 bytes")]
    InvalidKeyLength,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("malformed ciphertext")]
    MalformedCiphertext,
}

/// AES-256-GCM ciphertext: one IV and one tag over all blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcmCiphertext {
    pub iv: [u8; 16],
    pub tag: [u8; 16],
    pub data: Vec<Vec<u8>>,
}

/// AES-256-CTR ciphertext: no authentication tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtrCiphertext {
    pub iv: [u8; 16],
    pub data: Vec<Vec<u8>>,
}

/// Which XChaCha20 variant produced a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XChaChaAlgorithm {
    XChaCha20,
    XChaCha20Poly1305,
}

/// XChaCha20 / XChaCha20-Poly1305 ciphertext.
///
/// The wire nonce stays 16 bytes; the 24-byte cipher nonce is derived as
/// the first 24 bytes of SHA-256(nonce). For the Poly1305 variant the last
/// bundle entry is the 16-byte authentication tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XChaChaCiphertext {
    pub algorithm: XChaChaAlgorithm,
    pub nonce: [u8; 16],
    pub bundle: Vec<Vec<u8>>,
}

/// Split one contiguous buffer back into blocks of the given lengths.
/// Fails when the lengths do not account for the whole buffer.
pub(crate) fn split_blocks(bytes: &[u8], lengths: &[usize]) -> Result<Vec<Vec<u8>>, CipherError> {
    if lengths.iter().sum::<usize>() != bytes.len() {
        return Err(CipherError::MalformedCiphertext);
    }
    let mut out = Vec::with_capacity(lengths.len());
    let mut offset = 0;
    for &len in lengths {
        out.push(bytes[offset..offset + len].to_vec());
        offset += len;
    }
    Ok(out)
}
