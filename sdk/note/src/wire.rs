//! Note wire layouts.
//!
//! Two serialized layouts are supported, version-tagged by the caller:
//! the current record (plain `random` plus an encrypted annotation side
//! channel) and the legacy record (an `encryptedRandom` tuple plus a
//! `memoField` chunk array). All values are lower-case unprefixed hex.
//! Records deserialize and re-serialize byte-for-byte; deriving a note
//! from a record checks the embedded `npk` and token hash against the
//! caller-resolved key material.

use serde::{Deserialize, Serialize};

use crate::NoteError;
use crate::shield::NOTE_RANDOM_LEN;
use crate::token::TokenData;
use crate::transact::{NoteAnnotationData, OutputType, TransactNote};
use obscura_bytes::{bytes_to_hex, format_to_byte_length, hex_to_bytes, u128_to_bytes};
use obscura_cipher::aes;

/// Current note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactNoteWire {
    pub npk: String,
    pub value: String,
    pub token_hash: String,
    pub random: String,
    pub recipient_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_random: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shield_fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

/// Legacy note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyNoteWire {
    pub npk: String,
    pub value: String,
    pub token_hash: String,
    pub encrypted_random: [String; 2],
    pub memo_field: Vec<String>,
    pub recipient_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

fn value_to_hex(value: u128) -> String {
    bytes_to_hex(&format_to_byte_length(&u128_to_bytes(value), 16))
}

fn value_from_hex(hex: &str) -> Result<u128, NoteError> {
    let bytes = hex_to_bytes(hex)?;
    let stripped: Vec<u8> = bytes.iter().copied().skip_while(|&b| b == 0).collect();
    if stripped.len() > 16 {
        return Err(NoteError::FieldMismatch("value exceeds 128 bits"));
    }
    let padded = format_to_byte_length(&stripped, 16);
    Ok(u128::from_be_bytes(padded.try_into().unwrap()))
}

fn bytes32_from_hex(hex: &str, field: &'static str) -> Result<[u8; 32], NoteError> {
    let bytes = hex_to_bytes(hex)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| NoteError::FieldMismatch(field))
}

fn random_from_hex(hex: &str) -> Result<[u8; NOTE_RANDOM_LEN], NoteError> {
    let bytes = hex_to_bytes(hex)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| NoteError::InvalidRandomLength {
            expected: NOTE_RANDOM_LEN,
            got: bytes.len(),
        })
}

impl TransactNoteWire {
    /// Serialize a note into the current layout. Attribution fields start
    /// empty; [`with_annotation`](Self::with_annotation) fills them.
    pub fn from_note(note: &TransactNote, recipient_address: &str) -> Self {
        Self {
            npk: bytes_to_hex(&note.note_public_key()),
            value: value_to_hex(note.value),
            token_hash: bytes_to_hex(&note.token.hash()),
            random: bytes_to_hex(&note.random),
            recipient_address: recipient_address.to_string(),
            output_type: None,
            sender_random: None,
            wallet_source: None,
            sender_address: None,
            memo_text: note.memo_text.clone(),
            shield_fee: None,
            block_number: None,
        }
    }

    /// Attach decrypted annotation metadata to the record.
    pub fn with_annotation(mut self, annotation: &NoteAnnotationData) -> Self {
        self.output_type = Some(annotation.output_type.as_u8());
        self.sender_random = Some(bytes_to_hex(&annotation.sender_random));
        self.wallet_source = Some(annotation.wallet_source.clone());
        self
    }

    /// Reconstruct the note. The caller resolves the receiver's master
    /// public key and the token data; both are checked against the record.
    pub fn to_note(
        &self,
        receiver_master_public_key: &[u8; 32],
        token: TokenData,
    ) -> Result<TransactNote, NoteError> {
        let random = random_from_hex(&self.random)?;
        let value = value_from_hex(&self.value)?;

        let mut note = TransactNote::new(*receiver_master_public_key, random, value, token);
        note.memo_text = self.memo_text.clone();

        if bytes32_from_hex(&self.npk, "npk width")? != note.note_public_key() {
            return Err(NoteError::FieldMismatch("npk"));
        }
        if bytes32_from_hex(&self.token_hash, "token hash width")? != token.hash() {
            return Err(NoteError::FieldMismatch("token hash"));
        }
        Ok(note)
    }

    /// The annotation carried by the record, when present.
    pub fn annotation(&self) -> Result<Option<NoteAnnotationData>, NoteError> {
        let (Some(output_type), Some(sender_random), Some(wallet_source)) = (
            self.output_type,
            self.sender_random.as_deref(),
            self.wallet_source.as_deref(),
        ) else {
            return Ok(None);
        };

        let output_type =
            OutputType::from_u8(output_type).ok_or(NoteError::FieldMismatch("output type"))?;
        let bytes = hex_to_bytes(sender_random)?;
        let sender_random: [u8; 15] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| NoteError::FieldMismatch("sender random width"))?;

        Ok(Some(NoteAnnotationData {
            output_type,
            sender_random,
            wallet_source: wallet_source.to_string(),
        }))
    }
}

impl LegacyNoteWire {
    /// Serialize a note into the legacy layout, encrypting `random` under
    /// the viewing private key.
    pub fn from_note(
        note: &TransactNote,
        recipient_address: &str,
        viewing_private_key: &[u8; 32],
    ) -> Result<Self, NoteError> {
        let gcm = aes::gcm::encrypt(&[note.random.to_vec()], viewing_private_key)?;
        let mut iv_tag = Vec::with_capacity(32);
        iv_tag.extend_from_slice(&gcm.iv);
        iv_tag.extend_from_slice(&gcm.tag);
        let encrypted_random = [bytes_to_hex(&iv_tag), bytes_to_hex(&gcm.data[0])];

        let memo_field = match &note.memo_text {
            Some(memo) => obscura_bytes::chunk(memo.as_bytes(), 32)
                .into_iter()
                .map(|c| {
                    let mut padded = c;
                    padded.resize(32, 0);
                    bytes_to_hex(&padded)
                })
                .collect(),
            None => Vec::new(),
        };

        Ok(Self {
            npk: bytes_to_hex(&note.note_public_key()),
            value: value_to_hex(note.value),
            token_hash: bytes_to_hex(&note.token.hash()),
            encrypted_random,
            memo_field,
            recipient_address: recipient_address.to_string(),
            memo_text: note.memo_text.clone(),
            block_number: None,
        })
    }

    /// Reconstruct the note, decrypting `random` with the viewing private
    /// key.
    pub fn to_note(
        &self,
        receiver_master_public_key: &[u8; 32],
        token: TokenData,
        viewing_private_key: &[u8; 32],
    ) -> Result<TransactNote, NoteError> {
        let iv_tag = bytes32_from_hex(&self.encrypted_random[0], "encrypted random iv/tag")?;
        let data = hex_to_bytes(&self.encrypted_random[1])?;

        let ciphertext = obscura_cipher::GcmCiphertext {
            iv: iv_tag[..16].try_into().unwrap(),
            tag: iv_tag[16..].try_into().unwrap(),
            data: vec![data],
        };
        let blocks = aes::gcm::decrypt(&ciphertext, viewing_private_key)?;
        let random: [u8; NOTE_RANDOM_LEN] =
            blocks[0]
                .as_slice()
                .try_into()
                .map_err(|_| NoteError::InvalidRandomLength {
                    expected: NOTE_RANDOM_LEN,
                    got: blocks[0].len(),
                })?;

        let value = value_from_hex(&self.value)?;
        let mut note = TransactNote::new(*receiver_master_public_key, random, value, token);
        note.memo_text = self.memo_text.clone();

        if bytes32_from_hex(&self.npk, "npk width")? != note.note_public_key() {
            return Err(NoteError::FieldMismatch("npk"));
        }
        if bytes32_from_hex(&self.token_hash, "token hash width")? != token.hash() {
            return Err(NoteError::FieldMismatch("token hash"));
        }
        Ok(note)
    }

    /// Memo text recovered from the chunked memo field (trailing padding
    /// stripped).
    pub fn memo_from_field(&self) -> Result<Option<String>, NoteError> {
        if self.memo_field.is_empty() {
            return Ok(None);
        }
        let mut bytes = Vec::with_capacity(self.memo_field.len() * 32);
        for chunk in &self.memo_field {
            bytes.extend(hex_to_bytes(chunk)?);
        }
        while bytes.last() == Some(&0) {
            bytes.pop();
        }
        let memo =
            String::from_utf8(bytes).map_err(|_| NoteError::FieldMismatch("memo encoding"))?;
        Ok(Some(memo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transact::OutputType;

    fn note() -> TransactNote {
        TransactNote::new([3u8; 32], [8u8; 16], 12345, TokenData::erc20([0x22; 20]))
            .with_memo("coffee fund")
    }

    #[test]
    fn current_layout_note_round_trip() {
        let n = note();
        let wire = TransactNoteWire::from_note(&n, "0zk1qobscura");
        let back = wire.to_note(&[3u8; 32], n.token).unwrap();

        assert_eq!(back.hash(), n.hash());
        assert_eq!(back.random, n.random);
        assert_eq!(back.memo_text, n.memo_text);
    }

    #[test]
    fn current_layout_rejects_wrong_master_key() {
        let n = note();
        let wire = TransactNoteWire::from_note(&n, "0zk1qobscura");
        assert!(matches!(
            wire.to_note(&[4u8; 32], n.token),
            Err(NoteError::FieldMismatch("npk"))
        ));
    }

    #[test]
    fn annotation_fields_round_trip() {
        let ann = NoteAnnotationData {
            output_type: OutputType::Change,
            sender_random: [2u8; 15],
            wallet_source: "obscura".into(),
        };
        let wire = TransactNoteWire::from_note(&note(), "0zk1qobscura").with_annotation(&ann);
        assert_eq!(wire.annotation().unwrap().unwrap(), ann);
    }

    #[test]
    fn legacy_layout_note_round_trip() {
        let n = note();
        let viewing_key = [0x55u8; 32];
        let wire = LegacyNoteWire::from_note(&n, "0zk1qobscura", &viewing_key).unwrap();

        assert_eq!(wire.encrypted_random[0].len(), 64);
        assert_eq!(wire.encrypted_random[1].len(), 32);

        let back = wire.to_note(&[3u8; 32], n.token, &viewing_key).unwrap();
        assert_eq!(back.hash(), n.hash());
        assert_eq!(back.random, n.random);
    }

    #[test]
    fn legacy_memo_field_chunks() {
        let n = note();
        let wire = LegacyNoteWire::from_note(&n, "0zk1qobscura", &[0x55u8; 32]).unwrap();
        assert_eq!(wire.memo_field.len(), 1);
        assert_eq!(wire.memo_field[0].len(), 64);
        assert_eq!(wire.memo_from_field().unwrap().unwrap(), "coffee fund");
    }

    #[test]
    fn value_hex_round_trip() {
        for v in [0u128, 1, 1000, u128::MAX] {
            assert_eq!(value_from_hex(&value_to_hex(v)).unwrap(), v);
        }
        assert!(value_from_hex("ff00000000000000000000000000000000").is_err());
    }
}
