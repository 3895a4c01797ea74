//! Hashing — SHA-512 and HMAC-SHA-512.
//!
//! SHA-512 binds the header to every packet (the header hash prefixes
//! every authenticated payload hash) and compresses the v2 MAC-key
//! material. HMAC-SHA-512 produces the per-recipient authenticators,
//! which the wire format truncates to 32 bytes.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};

/// Compute the SHA-512 hash of arbitrary data.
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(Sha512::digest(data).as_slice());
    out
}

/// Compute a full HMAC-SHA-512 over `data`.
///
/// Truncation to the wire's 32-byte authenticator is the caller's
/// business; MAC-key derivation also consumes untruncated output.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac =
        Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    let mut out = [0u8; 64];
    out.copy_from_slice(mac.finalize().into_bytes().as_slice());
    out
}
