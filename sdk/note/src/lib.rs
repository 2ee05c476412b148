//! Obscura Note Model
//!
//! Confidential value commitments for a shielded-transaction protocol on
//! an account-based ledger.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Note lifecycle                            │
//! │                                                                  │
//! │  Constructed ──serialize──▶ wire record (current / legacy)       │
//! │      │                                                           │
//! │      └───────encrypt─────▶ ciphertext bundle (for recipient)     │
//! │                                                                  │
//! │  npk  = Poseidon(masterPublicKey, random)                        │
//! │  hash = Poseidon(npk, tokenDataHash, value)                      │
//! │  nullifier = Poseidon(nullifyingKey, leafPosition)               │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Notes are immutable once constructed: producing a different
//! serialization or ciphertext creates a new value, never mutates the
//! original. All hashes are computed with the Poseidon sponge so they can
//! be re-verified inside the protocol circuit.

pub mod blinded;
pub mod poseidon;
pub mod shield;
pub mod token;
pub mod transact;
pub mod unshield;
pub mod wire;

pub use shield::{PreImage, ShieldCiphertext, ShieldNote};
pub use token::{TokenData, TokenType, nft_shield_value};
pub use transact::{NoteAnnotationData, OutputType, TransactNote};
pub use unshield::{UnshieldFee, UnshieldNote};
pub use wire::{LegacyNoteWire, TransactNoteWire};

use obscura_bytes::BytesError;
use obscura_cipher::CipherError;
use thiserror::Error;

/// Note model errors.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("invalid random length: expected {expected} bytes, got {got}")]
    InvalidRandomLength { expected: usize, got: usize },

    #[error("unsupported token type: {0:?}")]
    UnsupportedTokenType(TokenType),

    #[error("wallet source exceeds 11 bytes: {0}")]
    WalletSourceTooLong(usize),

    #[error("peer public key is not a valid curve point")]
    InvalidPeerKey,

    #[error("note field mismatch: {0}")]
    FieldMismatch(&'static str),

    #[error(transparent)]
    Bytes(#[from] BytesError),

    #[error(transparent)]
    Cipher(#[from] CipherError),
}

impl NoteError {
    /// Whether this error is the expected "not addressed to me" outcome of
    /// a scan-decryption attempt, as opposed to corruption or a caller bug.
    pub fn is_no_match(&self) -> bool {
        matches!(self, NoteError::Cipher(CipherError::AuthenticationFailed))
    }
}
