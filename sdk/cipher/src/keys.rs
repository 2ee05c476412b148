//! Curve25519 key agreement.
//!
//! Derives the 32-byte symmetric key that seeds the cipher suite for note
//! encryption aimed at a specific recipient:
//!
//! ```text
//! shared = x25519(private_scalar, peer_public)
//! key    = HKDF-SHA256(shared, "obscura-note-v2")
//! ```
//!
//! Both directions derive the same key: `derive(a, B) == derive(b, A)`.
//! An invalid or low-order peer point yields `None` rather than an error —
//! bulk scan-decryption uses that outcome as a "not addressed to me" probe.

use hkdf::Hkdf;
use sha2::Sha256;
use x25519_dalek::{PublicKey, StaticSecret};

const SHARED_KEY_INFO: &[u8] = b"obscura-note-v2";

/// Derive a shared symmetric key from a private scalar and a peer public
/// key. Returns `None` when the exchange is non-contributory.
pub fn derive_shared_key(private_scalar: &[u8; 32], peer_public: &[u8; 32]) -> Option<[u8; 32]> {
    let secret = StaticSecret::from(*private_scalar);
    let peer = PublicKey::from(*peer_public);

    let shared = secret.diffie_hellman(&peer);
    if !shared.was_contributory() {
        return None;
    }

    let hk = Hkdf::<Sha256>::new(None, shared.as_bytes());
    let mut key = [0u8; 32];
    hk.expand(SHARED_KEY_INFO, &mut key).ok()?;
    Some(key)
}

/// The x25519 public key for a private scalar.
pub fn public_key(private_scalar: &[u8; 32]) -> [u8; 32] {
    let secret = StaticSecret::from(*private_scalar);
    *PublicKey::from(&secret).as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn random_scalar() -> [u8; 32] {
        let mut scalar = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut scalar);
        scalar
    }

    #[test]
    fn shared_key_symmetry() {
        let a = random_scalar();
        let b = random_scalar();
        let pub_a = public_key(&a);
        let pub_b = public_key(&b);

        let key_ab = derive_shared_key(&a, &pub_b).unwrap();
        let key_ba = derive_shared_key(&b, &pub_a).unwrap();
        assert_eq!(key_ab, key_ba);
    }

    #[test]
    fn different_peers_different_keys() {
        let a = random_scalar();
        let key_b = derive_shared_key(&a, &public_key(&random_scalar())).unwrap();
        let key_c = derive_shared_key(&a, &public_key(&random_scalar())).unwrap();
        assert_ne!(key_b, key_c);
    }

    #[test]
    fn low_order_peer_yields_none() {
        // the identity point is low-order: the exchange is non-contributory
        let a = random_scalar();
        assert_eq!(derive_shared_key(&a, &[0u8; 32]), None);
    }
}
