//! Shield notes: moving value from public to confidential form.
//!
//! A shield produces a `PreImage` for the ledger contract plus a fixed
//! 3×32-byte encrypted bundle and a 32-byte shield key:
//!
//! ```text
//! shared      = derive_shared_key(shieldPrivateKey, receiverViewingPub)
//! gcm         = AES-256-GCM(random, shared)            // 16-byte random
//! ctr         = AES-256-CTR(receiverViewingPub, shieldPrivateKey)
//! bundle[0]   = gcm.iv || gcm.tag
//! bundle[1]   = gcm.data || ctr.iv
//! bundle[2]   = ctr.data
//! shieldKey   = x25519 public key of shieldPrivateKey
//! ```
//!
//! The receiver recovers `random` by deriving the same shared key from
//! `shieldKey`; only the shielding party can recover the receiver key from
//! the CTR layer, since it is keyed with the shield private key itself.

use serde::{Deserialize, Serialize};

use crate::NoteError;
use crate::poseidon::{field_from_bytes, poseidon_bytes};
use crate::token::TokenData;
use obscura_cipher::{CtrCiphertext, GcmCiphertext, aes, keys};

/// Byte length of a note's `random` field in the current wire format.
pub const NOTE_RANDOM_LEN: usize = 16;

/// What the ledger contract needs to insert the commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreImage {
    pub npk: [u8; 32],
    pub token: TokenData,
    pub value: u128,
}

/// The encrypted shield payload: exactly three 32-byte words plus the
/// shielding party's public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldCiphertext {
    pub encrypted_bundle: [[u8; 32]; 3],
    pub shield_key: [u8; 32],
}

/// A note being shielded: plaintext fields known, commitment derivable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShieldNote {
    pub master_public_key: [u8; 32],
    pub random: [u8; NOTE_RANDOM_LEN],
    pub value: u128,
    pub token: TokenData,
}

impl ShieldNote {
    pub fn new(
        master_public_key: [u8; 32],
        random: [u8; NOTE_RANDOM_LEN],
        value: u128,
        token: TokenData,
    ) -> Self {
        Self {
            master_public_key,
            random,
            value,
            token,
        }
    }

    /// Construct from hex-encoded randomness, validating its length.
    pub fn from_random_hex(
        master_public_key: [u8; 32],
        random_hex: &str,
        value: u128,
        token: TokenData,
    ) -> Result<Self, NoteError> {
        let bytes = obscura_bytes::hex_to_bytes(random_hex)?;
        let random: [u8; NOTE_RANDOM_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| NoteError::InvalidRandomLength {
                    expected: NOTE_RANDOM_LEN,
                    got: bytes.len(),
                })?;
        Ok(Self::new(master_public_key, random, value, token))
    }

    /// `npk = Poseidon(masterPublicKey, random)`
    pub fn note_public_key(&self) -> [u8; 32] {
        poseidon_bytes(&[
            field_from_bytes(&self.master_public_key),
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

    pub fn pre_image(&self) -> PreImage {
        PreImage {
            npk: self.note_public_key(),
            token: self.token,
            value: self.value,
        }
    }

    /// Produce the encrypted shield bundle for a receiver.
    pub fn serialize(
        &self,
        shield_private_key: &[u8; 32],
        receiver_viewing_public_key: &[u8; 32],
    ) -> Result<ShieldCiphertext, NoteError> {
        let shared = keys::derive_shared_key(shield_private_key, receiver_viewing_public_key)
            .ok_or(NoteError::InvalidPeerKey)?;

        let gcm = aes::gcm::encrypt(&[self.random.to_vec()], &shared)?;
        let ctr = aes::ctr::encrypt(&[receiver_viewing_public_key.to_vec()], shield_private_key)?;

        let mut bundle = [[0u8; 32]; 3];
        bundle[0][..16].copy_from_slice(&gcm.iv);
        bundle[0][16..].copy_from_slice(&gcm.tag);
        bundle[1][..16].copy_from_slice(&gcm.data[0]);
        bundle[1][16..].copy_from_slice(&ctr.iv);
        bundle[2].copy_from_slice(&ctr.data[0]);

        Ok(ShieldCiphertext {
            encrypted_bundle: bundle,
            shield_key: keys::public_key(shield_private_key),
        })
    }

    /// Receiver side: recover the note `random` from a shield bundle using
    /// the shared key derived from the bundle's `shield_key`.
    pub fn decrypt_random(
        encrypted_bundle: &[[u8; 32]; 3],
        shared_key: &[u8; 32],
    ) -> Result<[u8; NOTE_RANDOM_LEN], NoteError> {
        let ciphertext = GcmCiphertext {
            iv: encrypted_bundle[0][..16].try_into().unwrap(),
            tag: encrypted_bundle[0][16..].try_into().unwrap(),
            data: vec![encrypted_bundle[1][..16].to_vec()],
        };
        let blocks = aes::gcm::decrypt(&ciphertext, shared_key)?;
        blocks[0]
            .as_slice()
            .try_into()
            .map_err(|_| NoteError::InvalidRandomLength {
                expected: NOTE_RANDOM_LEN,
                got: blocks[0].len(),
            })
    }

    /// Shielding-party side: recover the receiver viewing key from the CTR
    /// layer. Only the holder of the shield private key can do this.
    pub fn decrypt_receiver_viewing_key(
        encrypted_bundle: &[[u8; 32]; 3],
        shield_private_key: &[u8; 32],
    ) -> Result<[u8; 32], NoteError> {
        let ciphertext = CtrCiphertext {
            iv: encrypted_bundle[1][16..].try_into().unwrap(),
            data: vec![encrypted_bundle[2].to_vec()],
        };
        let blocks = aes::ctr::decrypt(&ciphertext, shield_private_key)?;
        blocks[0]
            .as_slice()
            .try_into()
            .map_err(|_| NoteError::FieldMismatch("receiver viewing key length"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> ShieldNote {
        ShieldNote::new(
            [5u8; 32],
            [9u8; NOTE_RANDOM_LEN],
            1000,
            TokenData::erc20([0x11; 20]),
        )
    }

    #[test]
    fn npk_and_hash_deterministic() {
        let n = note();
        assert_eq!(n.note_public_key(), n.note_public_key());
        assert_eq!(n.hash(), n.hash());
    }

    #[test]
    fn hash_binds_value() {
        let a = note();
        let mut b = note();
        b.value += 1;
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn from_random_hex_validates_length() {
        let token = TokenData::erc20([0x11; 20]);
        let short = ShieldNote::from_random_hex([5u8; 32], "0x0102", 1, token);
        assert!(matches!(
            short,
            Err(NoteError::InvalidRandomLength {
                expected: 16,
                got: 2
            })
        ));
    }

    #[test]
    fn pre_image_carries_npk() {
        let n = note();
        let pre = n.pre_image();
        assert_eq!(pre.npk, n.note_public_key());
        assert_eq!(pre.value, 1000);
    }
}
