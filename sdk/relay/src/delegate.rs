//! Session delegation authorization.
//!
//! Lets an ephemeral session temporarily delegate execution rights to the
//! relay contract. The signed preimage is the fixed format
//! `0x05 || rlp([chainId, delegateAddress, nonce])`, hashed with keccak256
//! and signed with a recoverable secp256k1 signature.

use k256::ecdsa::SigningKey;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::rlp;
use crate::{RelayError, keccak256};

/// Magic byte prefixed onto the RLP payload before hashing.
pub const DELEGATION_MAGIC: u8 = 0x05;

/// A signed delegation of execution rights to `address` on `chain_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationAuthorization {
    pub chain_id: u64,
    pub address: [u8; 20],
    pub nonce: u64,
    pub y_parity: u8,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

/// The keccak256 digest the authorization signature commits to.
pub fn authorization_hash(chain_id: u64, delegate_address: &[u8; 20], nonce: u64) -> [u8; 32] {
    let payload = rlp::encode_list(&[
        rlp::encode_uint(&BigUint::from(chain_id)),
        rlp::encode_bytes(delegate_address),
        rlp::encode_uint(&BigUint::from(nonce)),
    ]);

    let mut preimage = Vec::with_capacity(1 + payload.len());
    preimage.push(DELEGATION_MAGIC);
    preimage.extend(payload);
    keccak256(&preimage)
}

/// Sign a delegation authorization.
pub fn sign_delegation_authorization(
    signer: &SigningKey,
    delegate_address: [u8; 20],
    chain_id: u64,
    nonce: u64,
) -> Result<DelegationAuthorization, RelayError> {
    let digest = authorization_hash(chain_id, &delegate_address, nonce);

    let (signature, recovery_id) = signer
        .sign_prehash_recoverable(&digest)
        .map_err(|_| RelayError::SigningFailed)?;

    let bytes = signature.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);

    Ok(DelegationAuthorization {
        chain_id,
        address: delegate_address,
        nonce,
        y_parity: recovery_id.to_byte() & 1,
        r,
        s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

    fn signer() -> SigningKey {
        SigningKey::random(&mut rand::thread_rng())
    }

    #[test]
    fn hash_is_deterministic_and_input_sensitive() {
        let addr = [0x12u8; 20];
        let a = authorization_hash(1, &addr, 0);
        assert_eq!(a, authorization_hash(1, &addr, 0));
        assert_ne!(a, authorization_hash(1, &addr, 1));
        assert_ne!(a, authorization_hash(2, &addr, 0));
        assert_ne!(a, authorization_hash(1, &[0x13u8; 20], 0));
    }

    #[test]
    fn signature_recovers_to_signer() {
        let key = signer();
        let delegate = [0x77u8; 20];
        let auth = sign_delegation_authorization(&key, delegate, 1, 42).unwrap();

        let digest = authorization_hash(auth.chain_id, &auth.address, auth.nonce);
        let mut sig_bytes = [0u8; 64];
        sig_bytes[..32].copy_from_slice(&auth.r);
        sig_bytes[32..].copy_from_slice(&auth.s);
        let signature = Signature::from_slice(&sig_bytes).unwrap();
        let recovery_id = RecoveryId::from_byte(auth.y_parity).unwrap();

        let recovered =
            VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id).unwrap();
        assert_eq!(recovered, *key.verifying_key());
    }
}
