//! Minimal RLP encoder.
//!
//! Only what the delegation authorization preimage needs: byte strings,
//! unsigned integers (minimal big-endian, zero is the empty string) and
//! lists. Encoding only.

use num_bigint::BigUint;

fn length_prefix(len: usize, short_base: u8, long_base: u8) -> Vec<u8> {
    if len < 56 {
        vec![short_base + len as u8]
    } else {
        let len_bytes = obscura_bytes::u128_to_bytes(len as u128);
        let mut out = vec![long_base + len_bytes.len() as u8];
        out.extend(len_bytes);
        out
    }
}

/// RLP-encode a byte string.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        return bytes.to_vec();
    }
    let mut out = length_prefix(bytes.len(), 0x80, 0xb7);
    out.extend(bytes);
    out
}

/// RLP-encode an unsigned integer: minimal big-endian, zero encodes as
/// the empty string.
pub fn encode_uint(value: &BigUint) -> Vec<u8> {
    if *value == BigUint::from(0u8) {
        return encode_bytes(&[]);
    }
    encode_bytes(&value.to_bytes_be())
}

/// RLP-encode a list of already-encoded items.
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload: Vec<u8> = items.iter().flatten().copied().collect();
    let mut out = length_prefix(payload.len(), 0xc0, 0xf7);
    out.extend(payload);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        obscura_bytes::bytes_to_hex(bytes)
    }

    #[test]
    fn reference_vectors() {
        // vectors from the Ethereum RLP specification
        assert_eq!(hex(&encode_bytes(b"dog")), "83646f67");
        assert_eq!(hex(&encode_bytes(b"")), "80");
        assert_eq!(hex(&encode_bytes(&[0x00])), "00");
        assert_eq!(hex(&encode_bytes(&[0x0f])), "0f");
        assert_eq!(hex(&encode_bytes(&[0x04, 0x00])), "820400");
        assert_eq!(
            hex(&encode_list(&[
                encode_bytes(b"cat"),
                encode_bytes(b"dog")
            ])),
            "c88363617483646f67"
        );
        assert_eq!(hex(&encode_list(&[])), "c0");
    }

    #[test]
    fn integers() {
        assert_eq!(hex(&encode_uint(&BigUint::from(0u8))), "80");
        assert_eq!(hex(&encode_uint(&BigUint::from(15u8))), "0f");
        assert_eq!(hex(&encode_uint(&BigUint::from(1024u32))), "820400");
    }

    #[test]
    fn long_string_prefix() {
        let data = vec![0x61u8; 56];
        let encoded = encode_bytes(&data);
        assert_eq!(encoded[0], 0xb8);
        assert_eq!(encoded[1], 56);
        assert_eq!(encoded.len(), 58);
    }
}
