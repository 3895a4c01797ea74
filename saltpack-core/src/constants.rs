//! Format constants — values fixed by the saltpack wire format.
//!
//! The four nonce constants are ASCII strings used verbatim (or as
//! 16-byte prefixes completed by a big-endian counter). Changing any
//! of them breaks interoperability with every other implementation.

/// Format name carried in header element 0.
pub const FORMAT_NAME: &str = "saltpack";

/// Mode carried in header element 2. This crate implements encryption only.
pub const MODE_ENCRYPTION: i64 = 0;

/// X25519 key length in bytes (public, secret, payload, and MAC keys).
pub const KEY_LENGTH: usize = 32;

/// XSalsa20-Poly1305 nonce length in bytes.
pub const NONCE_LENGTH: usize = 24;

/// Poly1305 tag prepended to every box and secretbox.
pub const BOX_OVERHEAD: usize = 16;

/// Truncated HMAC-SHA-512 authenticator length in bytes.
pub const AUTHENTICATOR_LENGTH: usize = 32;

/// SHA-512 header hash length in bytes.
pub const HEADER_HASH_LENGTH: usize = 64;

/// Plaintext bytes per payload chunk unless the caller says otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

/// Nonce for the secretbox sealing the sender's long-term public key.
pub const SENDER_KEY_SECRETBOX_NONCE: &[u8; 24] = b"saltpack_sender_key_sbox";

/// v1 nonce for every recipient's payload-key box.
pub const PAYLOAD_KEY_BOX_NONCE_V1: &[u8; 24] = b"saltpack_payload_key_box";

/// v2 payload-key box nonce prefix, completed by the recipient index.
pub const PAYLOAD_KEY_BOX_NONCE_PREFIX_V2: &[u8; 16] = b"saltpack_recipsb";

/// Payload secretbox nonce prefix, completed by the chunk index.
pub const PAYLOAD_NONCE_PREFIX: &[u8; 16] = b"saltpack_ploadsb";
