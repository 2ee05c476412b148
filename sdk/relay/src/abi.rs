//! Minimal ABI encoder.
//!
//! Implements the Solidity `abi.encode` head/tail layout for the value
//! shapes the binding hash needs: unsigned integers, addresses, booleans,
//! fixed byte strings, dynamic byte strings, arrays and tuples. Encoding
//! only — this core never decodes contract data.

use num_bigint::BigUint;

const WORD: usize = 32;

/// An ABI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `uintN`, encoded big-endian into one word.
    Uint(BigUint),
    /// `address`, left-padded into one word.
    Address([u8; 20]),
    /// `bool`.
    Bool(bool),
    /// `bytesN` (N ≤ 32), right-padded into one word.
    FixedBytes(Vec<u8>),
    /// `bytes`: dynamic, length-prefixed.
    Bytes(Vec<u8>),
    /// `T[]`: dynamic, length-prefixed.
    Array(Vec<Token>),
    /// `(T1, ..., Tn)`.
    Tuple(Vec<Token>),
}

impl Token {
    fn is_dynamic(&self) -> bool {
        match self {
            Token::Bytes(_) | Token::Array(_) => true,
            Token::Tuple(members) => members.iter().any(Token::is_dynamic),
            _ => false,
        }
    }

    /// Head width of a static token.
    fn static_size(&self) -> usize {
        match self {
            Token::Tuple(members) if !self.is_dynamic() => {
                members.iter().map(Token::static_size).sum()
            }
            _ => WORD,
        }
    }

    /// In-place (head) encoding of a static token.
    fn encode_static(&self, out: &mut Vec<u8>) {
        match self {
            Token::Uint(value) => out.extend(word_from_uint(value)),
            Token::Address(addr) => {
                out.extend([0u8; 12]);
                out.extend(addr);
            }
            Token::Bool(b) => {
                let mut word = [0u8; WORD];
                word[WORD - 1] = *b as u8;
                out.extend(word);
            }
            Token::FixedBytes(bytes) => {
                debug_assert!(bytes.len() <= WORD);
                out.extend(bytes);
                out.extend(std::iter::repeat_n(0u8, WORD - bytes.len()));
            }
            Token::Tuple(members) => {
                for member in members {
                    member.encode_static(out);
                }
            }
            Token::Bytes(_) | Token::Array(_) => unreachable!("dynamic token in static position"),
        }
    }

    /// Tail encoding of a dynamic token.
    fn encode_tail(&self) -> Vec<u8> {
        match self {
            Token::Bytes(bytes) => {
                let mut out = word_from_usize(bytes.len()).to_vec();
                out.extend(bytes);
                let pad = bytes.len().div_ceil(WORD) * WORD - bytes.len();
                out.extend(std::iter::repeat_n(0u8, pad));
                out
            }
            Token::Array(elements) => {
                let mut out = word_from_usize(elements.len()).to_vec();
                out.extend(encode(elements));
                out
            }
            Token::Tuple(members) => encode(members),
            _ => unreachable!("static token in dynamic position"),
        }
    }
}

fn word_from_usize(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn word_from_uint(value: &BigUint) -> [u8; WORD] {
    let bytes = obscura_bytes::format_to_byte_length(&value.to_bytes_be(), WORD);
    let mut word = [0u8; WORD];
    word.copy_from_slice(&bytes);
    word
}

/// ABI-encode a token sequence as a tuple body (the `abi.encode` layout).
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len: usize = tokens
        .iter()
        .map(|t| if t.is_dynamic() { WORD } else { t.static_size() })
        .sum();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for token in tokens {
        if token.is_dynamic() {
            head.extend(word_from_usize(head_len + tail.len()));
            tail.extend(token.encode_tail());
        } else {
            token.encode_static(&mut head);
        }
    }

    head.extend(tail);
    head
}
