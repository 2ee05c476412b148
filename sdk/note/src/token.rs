//! Token identity and its circuit hash.
//!
//! ERC-20 tokens hash to their address alone, byte-formatted to 32 bytes;
//! NFT types hash through Poseidon so the sub-identifier is bound in.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use crate::NoteError;
use crate::poseidon::{field_from_bytes, poseidon_bytes};

/// Supported token standards (wire values 0/1/2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TokenType {
    Erc20 = 0,
    Erc721 = 1,
    Erc1155 = 2,
}

impl TokenType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TokenType::Erc20),
            1 => Some(TokenType::Erc721),
            2 => Some(TokenType::Erc1155),
            _ => None,
        }
    }
}

impl From<TokenType> for u8 {
    fn from(token_type: TokenType) -> u8 {
        token_type.as_u8()
    }
}

impl TryFrom<u8> for TokenType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or_else(|| format!("unknown token type: {value}"))
    }
}

/// A token's full identity: standard, contract address, sub-identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub token_type: TokenType,
    pub token_address: [u8; 20],
    pub token_sub_id: [u8; 32],
}

impl TokenData {
    /// An ERC-20 token: the sub-identifier is zero by definition.
    pub fn erc20(token_address: [u8; 20]) -> Self {
        Self {
            token_type: TokenType::Erc20,
            token_address,
            token_sub_id: [0u8; 32],
        }
    }

    pub fn nft(token_type: TokenType, token_address: [u8; 20], token_sub_id: [u8; 32]) -> Self {
        Self {
            token_type,
            token_address,
            token_sub_id,
        }
    }

    /// The 32-byte token hash committed inside notes.
    ///
    /// ERC-20: the address alone, left-padded to 32 bytes. NFT types:
    /// `Poseidon(tokenType, tokenAddress, tokenSubID)`.
    pub fn hash(&self) -> [u8; 32] {
        match self.token_type {
            TokenType::Erc20 => {
                let padded = obscura_bytes::format_to_byte_length(&self.token_address, 32);
                let mut out = [0u8; 32];
                out.copy_from_slice(&padded);
                out
            }
            TokenType::Erc721 | TokenType::Erc1155 => poseidon_bytes(&[
                Fr::from(self.token_type.as_u8()),
                field_from_bytes(&self.token_address),
                field_from_bytes(&self.token_sub_id),
            ]),
        }
    }
}

/// Resolve the value an NFT shield carries.
///
/// ERC-721 is always exactly one token unit. ERC-1155 takes the caller's
/// value, where `0` means "shield the entire balance" (resolved upstream
/// by the ledger client). ERC-20 has no NFT value semantics.
pub fn nft_shield_value(token_type: TokenType, requested: u128) -> Result<u128, NoteError> {
    match token_type {
        TokenType::Erc721 => Ok(1),
        TokenType::Erc1155 => Ok(requested),
        TokenType::Erc20 => Err(NoteError::UnsupportedTokenType(token_type)),
    }
}
