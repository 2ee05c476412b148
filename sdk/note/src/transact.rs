//! Transact notes: confidential transfers between shielded balances.
//!
//! The note ciphertext is AES-256-GCM under a Diffie-Hellman shared key
//! between two already-blinded viewing keys. Transaction metadata rides in
//! a separately encrypted annotation side channel so a third-party relayer
//! cannot read it.

use serde::{Deserialize, Serialize};

use crate::NoteError;
use crate::poseidon::{field_from_bytes, poseidon_bytes};
use crate::shield::NOTE_RANDOM_LEN;
use crate::token::TokenData;
use obscura_cipher::{GcmCiphertext, aes};

/// Why an output exists, from the sender's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputType {
    Transfer = 0,
    RelayerFee = 1,
    Change = 2,
}

impl OutputType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OutputType::Transfer),
            1 => Some(OutputType::RelayerFee),
            2 => Some(OutputType::Change),
            _ => None,
        }
    }
}

/// Maximum byte length of the wallet-source label.
pub const WALLET_SOURCE_MAX: usize = 11;

/// Sender-side transaction metadata, packed into one encrypted 32-byte
/// block: `outputType(1) || senderRandom(15) || walletSource(16, left-padded)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteAnnotationData {
    pub output_type: OutputType,
    pub sender_random: [u8; 15],
    pub wallet_source: String,
}

impl NoteAnnotationData {
    /// Pack into the fixed 32-byte annotation block.
    pub fn pack(&self) -> Result<[u8; 32], NoteError> {
        let source = self.wallet_source.as_bytes();
        if source.len() > WALLET_SOURCE_MAX {
            return Err(NoteError::WalletSourceTooLong(source.len()));
        }

        let mut block = [0u8; 32];
        block[0] = self.output_type.as_u8();
        block[1..16].copy_from_slice(&self.sender_random);
        block[32 - source.len()..].copy_from_slice(source);
        Ok(block)
    }

    /// Unpack a decrypted annotation block.
    pub fn unpack(block: &[u8; 32]) -> Result<Self, NoteError> {
        let output_type =
            OutputType::from_u8(block[0]).ok_or(NoteError::FieldMismatch("output type"))?;
        let sender_random: [u8; 15] = block[1..16].try_into().unwrap();

        let source_bytes: Vec<u8> = block[16..]
            .iter()
            .copied()
            .skip_while(|&b| b == 0)
            .collect();
        let wallet_source = String::from_utf8(source_bytes)
            .map_err(|_| NoteError::FieldMismatch("wallet source encoding"))?;

        Ok(Self {
            output_type,
            sender_random,
            wallet_source,
        })
    }

    /// Encrypt the annotation under the sender's viewing key. Only the
    /// sender (and, via blinding, optionally the receiver) can read it.
    pub fn encrypt(&self, sender_viewing_key: &[u8; 32]) -> Result<GcmCiphertext, NoteError> {
        let block = self.pack()?;
        Ok(aes::gcm::encrypt(&[block.to_vec()], sender_viewing_key)?)
    }

    pub fn decrypt(
        ciphertext: &GcmCiphertext,
        sender_viewing_key: &[u8; 32],
    ) -> Result<Self, NoteError> {
        let blocks = aes::gcm::decrypt(ciphertext, sender_viewing_key)?;
        let block: [u8; 32] = blocks
            .first()
            .and_then(|b| b.as_slice().try_into().ok())
            .ok_or(NoteError::FieldMismatch("annotation block length"))?;
        Self::unpack(&block)
    }
}

/// A confidential transfer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactNote {
    pub receiver_master_public_key: [u8; 32],
    pub random: [u8; NOTE_RANDOM_LEN],
    pub value: u128,
    pub token: TokenData,
    pub memo_text: Option<String>,
}

impl TransactNote {
    pub fn new(
        receiver_master_public_key: [u8; 32],
        random: [u8; NOTE_RANDOM_LEN],
        value: u128,
        token: TokenData,
    ) -> Self {
        Self {
            receiver_master_public_key,
            random,
            value,
            token,
            memo_text: None,
        }
    }

    /// Attach a memo; returns a new note, the original is never mutated.
    pub fn with_memo(mut self, memo_text: impl Into<String>) -> Self {
        self.memo_text = Some(memo_text.into());
        self
    }

    /// `npk = Poseidon(masterPublicKey, random)`
    pub fn note_public_key(&self) -> [u8; 32] {
        poseidon_bytes(&[
            field_from_bytes(&self.receiver_master_public_key),
            field_from_bytes(&self.random),
        ])
    }

    /// Commitment hash: `Poseidon(npk, tokenDataHash, value)`.
    pub fn hash(&self) -> [u8; 32] {
        poseidon_bytes(&[
            field_from_bytes(&self.note_public_key()),
            field_from_bytes(&self.token.hash()),
            self.value.into(),
        ])
    }

    /// `nullifier = Poseidon(nullifyingKey, leafPosition)`
    pub fn nullifier(nullifying_key: &[u8; 32], leaf_position: u64) -> [u8; 32] {
        poseidon_bytes(&[field_from_bytes(nullifying_key), leaf_position.into()])
    }

    /// Encrypt the note's confidential fields under a shared key derived
    /// between two blinded viewing keys. Blocks:
    /// `[masterPublicKey, tokenHash, random || value]` plus memo chunks.
    pub fn encrypt(&self, shared_key: &[u8; 32]) -> Result<GcmCiphertext, NoteError> {
        let mut third = Vec::with_capacity(32);
        third.extend_from_slice(&self.random);
        third.extend_from_slice(&self.value.to_be_bytes());

        let mut blocks = vec![
            self.receiver_master_public_key.to_vec(),
            self.token.hash().to_vec(),
            third,
        ];
        if let Some(memo) = &self.memo_text {
            blocks.extend(obscura_bytes::chunk(memo.as_bytes(), 32));
        }

        Ok(aes::gcm::encrypt(&blocks, shared_key)?)
    }

    /// Decrypt a note ciphertext. The caller supplies the resolved token
    /// data; its hash must match the encrypted token-hash block.
    pub fn decrypt(
        ciphertext: &GcmCiphertext,
        shared_key: &[u8; 32],
        token: TokenData,
    ) -> Result<Self, NoteError> {
        let blocks = aes::gcm::decrypt(ciphertext, shared_key)?;
        if blocks.len() < 3 || blocks[0].len() != 32 || blocks[1].len() != 32 {
            return Err(NoteError::FieldMismatch("note ciphertext shape"));
        }

        if blocks[1].as_slice() != token.hash() {
            return Err(NoteError::FieldMismatch("token hash"));
        }

        let receiver_master_public_key: [u8; 32] = blocks[0].as_slice().try_into().unwrap();
        let third = &blocks[2];
        if third.len() != 32 {
            return Err(NoteError::FieldMismatch("note ciphertext shape"));
        }
        let random: [u8; NOTE_RANDOM_LEN] = third[..NOTE_RANDOM_LEN].try_into().unwrap();
        let value = u128::from_be_bytes(third[NOTE_RANDOM_LEN..].try_into().unwrap());

        let memo_text = if blocks.len() > 3 {
            let memo_bytes = obscura_bytes::combine(&blocks[3..]);
            Some(
                String::from_utf8(memo_bytes)
                    .map_err(|_| NoteError::FieldMismatch("memo encoding"))?,
            )
        } else {
            None
        };

        Ok(Self {
            receiver_master_public_key,
            random,
            value,
            token,
            memo_text,
        })
    }

    /// Bulk-scan decryption attempt: an authentication failure means "not
    /// addressed to me" and becomes `None`; every other error propagates.
    pub fn scan_decrypt(
        ciphertext: &GcmCiphertext,
        shared_key: &[u8; 32],
        token: TokenData,
    ) -> Result<Option<Self>, NoteError> {
        match Self::decrypt(ciphertext, shared_key, token) {
            Ok(note) => Ok(Some(note)),
            Err(e) if e.is_no_match() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
