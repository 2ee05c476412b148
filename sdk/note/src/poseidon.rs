//! Poseidon sponge over BN254.
//!
//! One shared configuration for every commitment, nullifier and blinded
//! identifier in the protocol. Field: BN254 Fr (254 bits), rate 2,
//! capacity 1, 8 full / 57 partial rounds, alpha 5.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::{
    CryptographicSponge,
    poseidon::{PoseidonConfig, PoseidonSponge, find_poseidon_ark_and_mds},
};
use ark_ff::{BigInteger, PrimeField};
use std::sync::OnceLock;

fn config() -> &'static PoseidonConfig<Fr> {
    static CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();
    CONFIG.get_or_init(|| {
        let prime_bits: u64 = 254;
        let rate: usize = 2;
        let capacity: usize = 1;
        let full_rounds: u64 = 8;
        let partial_rounds: u64 = 57;
        let alpha: u64 = 5;
        let skip_matrices: u64 = 0;

        let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
            prime_bits,
            rate,
            full_rounds,
            partial_rounds,
            skip_matrices,
        );

        PoseidonConfig::new(
            full_rounds as usize,
            partial_rounds as usize,
            alpha,
            mds,
            ark,
            rate,
            capacity,
        )
    })
}

/// Poseidon hash of field elements, absorbed in argument order.
/// Argument order is part of every caller's contract.
pub fn poseidon(inputs: &[Fr]) -> Fr {
    let mut sponge = PoseidonSponge::new(config());
    for input in inputs {
        sponge.absorb(input);
    }
    sponge.squeeze_field_elements(1)[0]
}

/// Poseidon hash returning the canonical 32-byte big-endian form.
pub fn poseidon_bytes(inputs: &[Fr]) -> [u8; 32] {
    field_to_bytes(&poseidon(inputs))
}

/// Interpret bytes as a field element (big-endian, reduced mod order).
pub fn field_from_bytes(bytes: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(bytes)
}

/// Canonical 32-byte big-endian encoding of a field element.
pub fn field_to_bytes(f: &Fr) -> [u8; 32] {
    let bytes = f.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}
