//! Crypto primitives — NaCl box and secretbox (X25519 + XSalsa20-Poly1305).
//!
//! Thin adapter over `crypto_box` / `crypto_secretbox`, which are
//! wire-compatible with libsodium: every sealed output carries a 16-byte
//! Poly1305 tag prefix. Unlike the usual random-nonce construction, all
//! nonces here are chosen by the caller — the format derives them from
//! fixed ASCII constants plus counters, so sealing is deterministic given
//! the keys.

use crypto_box::{
    aead::{Aead, KeyInit},
    PublicKey, SalsaBox, SecretKey,
};
use crypto_secretbox::XSalsa20Poly1305;
use rand_core::{OsRng, RngCore};

use crate::constants::KEY_LENGTH;
use crate::errors::SaltpackError;

/// X25519 keypair (long-term or ephemeral).
///
/// 32-byte public key (Curve25519 point) and 32-byte secret key.
/// The secret half is deterministically zeroized on drop via volatile
/// writes.
#[derive(Clone)]
pub struct KeyPair {
    /// Curve25519 public key (32 bytes).
    pub public_key: [u8; 32],
    /// Curve25519 secret key (32 bytes).
    pub secret_key: [u8; 32],
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        // Volatile writes prevent the compiler from optimizing away the zeroization.
        for byte in self.secret_key.iter_mut() {
            unsafe { std::ptr::write_volatile(byte as *mut u8, 0u8) };
        }
        std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);
    }
}

/// Generate a fresh X25519 keypair from the OS CSPRNG.
pub fn generate_keypair() -> KeyPair {
    let mut secret_bytes = [0u8; KEY_LENGTH];
    OsRng.fill_bytes(&mut secret_bytes);
    KeyPair {
        public_key: public_from_secret(&secret_bytes),
        secret_key: secret_bytes,
    }
}

/// Derive the public key for a secret key (base-point X25519).
pub fn public_from_secret(secret_key: &[u8; 32]) -> [u8; 32] {
    let sk = SecretKey::from(*secret_key);
    *sk.public_key().as_bytes()
}

/// Draw a random 32-byte symmetric key.
pub(crate) fn random_key() -> [u8; 32] {
    let mut key = [0u8; KEY_LENGTH];
    OsRng.fill_bytes(&mut key);
    key
}

/// Seal with NaCl box under a caller-supplied nonce.
///
/// Output is `tag (16) || ciphertext`.
///
/// # Errors
/// Returns `SaltpackError::CryptoFailure` if sealing fails.
pub(crate) fn box_seal(
    plaintext: &[u8],
    nonce: &[u8; 24],
    their_public: &[u8; 32],
    our_secret: &[u8; 32],
) -> Result<Vec<u8>, SaltpackError> {
    let pk = PublicKey::from(*their_public);
    let sk = SecretKey::from(*our_secret);
    SalsaBox::new(&pk, &sk)
        .encrypt(nonce.into(), plaintext)
        .map_err(|_| SaltpackError::CryptoFailure("box seal"))
}

/// Precomputed box state for one X25519 pairing.
///
/// `SalsaBox::new` runs the scalar multiplication once; reusing the
/// result amortizes it across every recipient slot tried during
/// decryption.
pub(crate) struct SharedBox {
    inner: SalsaBox,
}

impl SharedBox {
    pub(crate) fn new(their_public: &[u8; 32], our_secret: &[u8; 32]) -> SharedBox {
        let pk = PublicKey::from(*their_public);
        let sk = SecretKey::from(*our_secret);
        SharedBox {
            inner: SalsaBox::new(&pk, &sk),
        }
    }

    /// Attempt to open a box; `None` when it was not sealed for this pairing.
    pub(crate) fn try_open(&self, ciphertext: &[u8], nonce: &[u8; 24]) -> Option<Vec<u8>> {
        self.inner.decrypt(nonce.into(), ciphertext).ok()
    }
}

/// Seal with NaCl secretbox under a caller-supplied nonce and key.
///
/// Output is `tag (16) || ciphertext`.
///
/// # Errors
/// Returns `SaltpackError::CryptoFailure` if sealing fails.
pub(crate) fn secretbox_seal(
    plaintext: &[u8],
    nonce: &[u8; 24],
    key: &[u8; 32],
) -> Result<Vec<u8>, SaltpackError> {
    XSalsa20Poly1305::new(key.into())
        .encrypt(nonce.into(), plaintext)
        .map_err(|_| SaltpackError::CryptoFailure("secretbox seal"))
}

/// Open a NaCl secretbox.
///
/// # Errors
/// Returns `SaltpackError::CryptoFailure` on a forged or damaged secretbox.
pub(crate) fn secretbox_open(
    ciphertext: &[u8],
    nonce: &[u8; 24],
    key: &[u8; 32],
) -> Result<Vec<u8>, SaltpackError> {
    XSalsa20Poly1305::new(key.into())
        .decrypt(nonce.into(), ciphertext)
        .map_err(|_| SaltpackError::CryptoFailure("secretbox open"))
}
