//! Obscura Byte Codec
//!
//! Canonical conversion between hex strings, integers and byte sequences.
//!
//! Every value handled by the SDK — keys, commitments, ciphertext blocks,
//! token identifiers — normalizes to the same canonical form: a lower-case,
//! unprefixed hex string of even length. The codec also provides fixed-width
//! padding/trimming and chunking helpers that the cipher and note layers
//! build on.

use num_bigint::BigUint;
use thiserror::Error;

/// Byte codec errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BytesError {
    #[error("invalid hex encoding: {0}")]
    InvalidEncoding(String),

    #[error("value is {got} bytes, cannot pad to {target}")]
    ValueTooLong { got: usize, target: usize },
}

/// Which end of a byte sequence an operation applies to.
///
/// `Left` is the high-order end: padding on the left preserves numeric
/// value, trimming on the left discards high-order bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteSide {
    Left,
    Right,
}

/// Normalize a hex string: strip an optional `0x` prefix, lowercase, and
/// validate charset and even length.
pub fn normalize_hex(value: &str) -> Result<String, BytesError> {
    let stripped = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if stripped.len() % 2 != 0 {
        return Err(BytesError::InvalidEncoding(format!(
            "odd-length hex string: {value}"
        )));
    }
    if !stripped.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(BytesError::InvalidEncoding(format!(
            "non-hex character in: {value}"
        )));
    }

    Ok(stripped.to_ascii_lowercase())
}

/// Decode a (possibly `0x`-prefixed) hex string into bytes.
pub fn hex_to_bytes(value: &str) -> Result<Vec<u8>, BytesError> {
    let normalized = normalize_hex(value)?;
    hex::decode(&normalized).map_err(|e| BytesError::InvalidEncoding(e.to_string()))
}

/// Encode bytes as lower-case unprefixed hex.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Encode bytes as `0x`-prefixed lower-case hex.
pub fn bytes_to_prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Minimal big-endian encoding of an unsigned 128-bit integer.
///
/// Matches `BigUint::to_bytes_be`: zero encodes as a single zero byte.
pub fn u128_to_bytes(value: u128) -> Vec<u8> {
    biguint_to_bytes(&BigUint::from(value))
}

/// Minimal big-endian encoding of an arbitrary-precision unsigned integer.
pub fn biguint_to_bytes(value: &BigUint) -> Vec<u8> {
    value.to_bytes_be()
}

/// Interpret bytes as a big-endian unsigned integer.
pub fn bytes_to_biguint(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Pad a byte sequence with zero bytes on the given side to exactly
/// `length` bytes. Padding never truncates: a longer input is an error.
pub fn pad_to_length(bytes: &[u8], length: usize, side: ByteSide) -> Result<Vec<u8>, BytesError> {
    if bytes.len() > length {
        return Err(BytesError::ValueTooLong {
            got: bytes.len(),
            target: length,
        });
    }

    let mut padded = Vec::with_capacity(length);
    match side {
        ByteSide::Left => {
            padded.resize(length - bytes.len(), 0);
            padded.extend_from_slice(bytes);
        }
        ByteSide::Right => {
            padded.extend_from_slice(bytes);
            padded.resize(length, 0);
        }
    }
    Ok(padded)
}

/// Truncate a byte sequence to `length` bytes by discarding bytes from the
/// given side: `Left` drops high-order bytes (keeps the right-most
/// `length`), `Right` keeps the left-most `length`. A shorter input is
/// returned unchanged.
pub fn trim(bytes: &[u8], length: usize, side: ByteSide) -> Vec<u8> {
    if bytes.len() <= length {
        return bytes.to_vec();
    }
    match side {
        ByteSide::Left => bytes[bytes.len() - length..].to_vec(),
        ByteSide::Right => bytes[..length].to_vec(),
    }
}

/// Format a value to an exact byte width: pad-left, then trim-left.
///
/// Overflowing high-order bytes are silently discarded — callers must
/// pre-validate magnitude where overflow would be a bug.
pub fn format_to_byte_length(bytes: &[u8], length: usize) -> Vec<u8> {
    if bytes.len() >= length {
        trim(bytes, length, ByteSide::Left)
    } else {
        // pad cannot fail here: bytes.len() < length
        pad_to_length(bytes, length, ByteSide::Left).unwrap_or_default()
    }
}

/// Format a hex value to an exact byte width, returning hex.
pub fn format_hex_to_byte_length(
    value: &str,
    length: usize,
    prefixed: bool,
) -> Result<String, BytesError> {
    let bytes = hex_to_bytes(value)?;
    let formatted = format_to_byte_length(&bytes, length);
    Ok(if prefixed {
        bytes_to_prefixed_hex(&formatted)
    } else {
        bytes_to_hex(&formatted)
    })
}

/// Split a byte sequence into `size`-byte chunks. The final chunk carries
/// any remainder.
pub fn chunk(data: &[u8], size: usize) -> Vec<Vec<u8>> {
    data.chunks(size).map(|c| c.to_vec()).collect()
}

/// Concatenate chunks back into one byte sequence. Exact inverse of
/// [`chunk`] for any input whose length is a multiple of the chunk size.
pub fn combine(chunks: &[Vec<u8>]) -> Vec<u8> {
    chunks.iter().flat_map(|c| c.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_prefix_and_lowercases() {
        assert_eq!(normalize_hex("0xDEADbeef").unwrap(), "deadbeef");
        assert_eq!(normalize_hex("DEADbeef").unwrap(), "deadbeef");
        assert_eq!(normalize_hex("").unwrap(), "");
    }

    #[test]
    fn normalize_rejects_bad_input() {
        assert!(matches!(
            normalize_hex("0xabc"),
            Err(BytesError::InvalidEncoding(_))
        ));
        assert!(matches!(
            normalize_hex("zzzz"),
            Err(BytesError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn representations_normalize_identically() {
        // 0x01f4 == 500 in all four representations
        let from_hex = hex_to_bytes("0x01f4").unwrap();
        let from_int = u128_to_bytes(500);
        let from_big = biguint_to_bytes(&BigUint::from(500u32));

        assert_eq!(bytes_to_hex(&from_hex), "01f4");
        assert_eq!(bytes_to_hex(&from_int), "01f4");
        assert_eq!(bytes_to_hex(&from_big), "01f4");
    }

    #[test]
    fn pad_and_trim_sides() {
        let v = vec![0xab, 0xcd];
        assert_eq!(
            pad_to_length(&v, 4, ByteSide::Left).unwrap(),
            vec![0, 0, 0xab, 0xcd]
        );
        assert_eq!(
            pad_to_length(&v, 4, ByteSide::Right).unwrap(),
            vec![0xab, 0xcd, 0, 0]
        );
        assert!(pad_to_length(&v, 1, ByteSide::Left).is_err());

        let w = vec![1, 2, 3, 4];
        assert_eq!(trim(&w, 2, ByteSide::Left), vec![3, 4]);
        assert_eq!(trim(&w, 2, ByteSide::Right), vec![1, 2]);
        assert_eq!(trim(&w, 8, ByteSide::Left), w);
    }

    #[test]
    fn trim_of_pad_matches_format() {
        for value in [vec![], vec![0x7f], vec![0xde, 0xad], vec![1, 2, 3, 4]] {
            let padded = pad_to_length(&value, 8, ByteSide::Left).unwrap();
            assert_eq!(
                trim(&padded, 8, ByteSide::Left),
                format_to_byte_length(&value, 8)
            );
        }
    }

    #[test]
    fn format_discards_overflow_high_order_bytes() {
        let v = vec![0xff, 0xaa, 0xbb];
        assert_eq!(format_to_byte_length(&v, 2), vec![0xaa, 0xbb]);
        assert_eq!(
            format_hex_to_byte_length("0xffaabb", 2, true).unwrap(),
            "0xaabb"
        );
    }

    #[test]
    fn chunk_combine_inverse() {
        let data: Vec<u8> = (0..64).collect();
        let chunks = chunk(&data, 32);
        assert_eq!(chunks.len(), 2);
        assert_eq!(combine(&chunks), data);
    }

    #[test]
    fn chunk_remainder() {
        let data: Vec<u8> = (0..40).collect();
        let chunks = chunk(&data, 32);
        assert_eq!(chunks[1].len(), 8);
        assert_eq!(combine(&chunks), data);
    }
}
