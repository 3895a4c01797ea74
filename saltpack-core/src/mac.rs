//! Per-recipient MAC-key derivation.
//!
//! Each recipient gets a 32-byte HMAC key bound to the header hash. The
//! key material comes from boxing 32 zero bytes under a nonce carved out
//! of the header hash, then keeping the last 32 bytes of the box — pure
//! XSalsa20 keystream, reproducible by either side of the X25519 pairing.
//!
//! v1 boxes once, from the sender's long-term key. v2 boxes twice — once
//! from the long-term key and once from the message's ephemeral key, with
//! the low bit of nonce byte 15 distinguishing the two — and hashes the
//! concatenated tails. Binding the MAC key to both keys forecloses
//! misbinding attacks across different sender/ephemeral pairings.
//!
//! On decrypt the same boxes are computed from the recipient's side:
//! the peer public keys swap in for the secret keys and X25519 symmetry
//! yields identical key material.

use zeroize::Zeroizing;

use crate::crypto;
use crate::errors::SaltpackError;
use crate::hash::sha512;
use crate::version::Version;

/// One side of a box pairing: a peer public key and our secret key.
pub(crate) struct BoxPair<'a> {
    pub public: &'a [u8; 32],
    pub secret: &'a [u8; 32],
}

/// Derive the MAC keys for every recipient of an outgoing message.
pub(crate) fn derive_all(
    version: Version,
    header_hash: &[u8; 64],
    recipient_publics: &[[u8; 32]],
    sender_secret: &[u8; 32],
    ephemeral_secret: &[u8; 32],
) -> Result<Vec<Zeroizing<[u8; 32]>>, SaltpackError> {
    recipient_publics
        .iter()
        .enumerate()
        .map(|(index, recipient_public)| {
            derive_one(
                version,
                header_hash,
                index as u64,
                BoxPair {
                    public: recipient_public,
                    secret: sender_secret,
                },
                BoxPair {
                    public: recipient_public,
                    secret: ephemeral_secret,
                },
            )
        })
        .collect()
}

/// Derive the MAC key for the matched recipient of an incoming message.
pub(crate) fn derive_for_recipient(
    version: Version,
    header_hash: &[u8; 64],
    recipient_index: u64,
    sender_public: &[u8; 32],
    ephemeral_public: &[u8; 32],
    recipient_secret: &[u8; 32],
) -> Result<Zeroizing<[u8; 32]>, SaltpackError> {
    derive_one(
        version,
        header_hash,
        recipient_index,
        BoxPair {
            public: sender_public,
            secret: recipient_secret,
        },
        BoxPair {
            public: ephemeral_public,
            secret: recipient_secret,
        },
    )
}

/// Shared derivation core.
///
/// `long_term` is the sender/recipient pairing, `ephemeral` the
/// ephemeral/recipient pairing; v1 only uses the former.
fn derive_one(
    version: Version,
    header_hash: &[u8; 64],
    recipient_index: u64,
    long_term: BoxPair<'_>,
    ephemeral: BoxPair<'_>,
) -> Result<Zeroizing<[u8; 32]>, SaltpackError> {
    match version {
        Version::V1 => {
            let mut nonce = [0u8; 24];
            nonce.copy_from_slice(&header_hash[..24]);
            box_tail(&nonce, long_term)
        }
        Version::V2 => {
            let long_tail = box_tail(&v2_nonce(header_hash, recipient_index, false), long_term)?;
            let ephemeral_tail =
                box_tail(&v2_nonce(header_hash, recipient_index, true), ephemeral)?;

            let mut tails = Zeroizing::new([0u8; 64]);
            tails[..32].copy_from_slice(long_tail.as_slice());
            tails[32..].copy_from_slice(ephemeral_tail.as_slice());

            let digest = Zeroizing::new(sha512(tails.as_slice()));
            let mut key = Zeroizing::new([0u8; 32]);
            key.copy_from_slice(&digest[..32]);
            Ok(key)
        }
    }
}

/// The 16-byte header-hash prefix with the low bit of byte 15 forced,
/// completed by the big-endian recipient index.
fn v2_nonce(header_hash: &[u8; 64], recipient_index: u64, odd: bool) -> [u8; 24] {
    let mut nonce = [0u8; 24];
    nonce[..16].copy_from_slice(&header_hash[..16]);
    if odd {
        nonce[15] |= 0x01;
    } else {
        nonce[15] &= 0xFE;
    }
    nonce[16..].copy_from_slice(&recipient_index.to_be_bytes());
    nonce
}

/// Box 32 zero bytes and keep the last 32 bytes of the result.
///
/// The box is `tag (16) || keystream-encrypted zeros (32)`, so the tail
/// is exactly the first 32 XSalsa20 keystream bytes for this pairing and
/// nonce.
fn box_tail(nonce: &[u8; 24], pair: BoxPair<'_>) -> Result<Zeroizing<[u8; 32]>, SaltpackError> {
    let boxed = Zeroizing::new(crypto::box_seal(&[0u8; 32], nonce, pair.public, pair.secret)?);
    let mut tail = Zeroizing::new([0u8; 32]);
    tail.copy_from_slice(&boxed[boxed.len() - 32..]);
    Ok(tail)
}
