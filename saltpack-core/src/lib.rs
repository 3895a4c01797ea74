//! Saltpack encryption mode — the core cryptographic pipeline.
//!
//! Implements the binary message format that delivers an authenticated,
//! encrypted payload to one or more recipients: X25519 key agreement,
//! XSalsa20-Poly1305 boxes and secretboxes, and per-recipient
//! HMAC-SHA-512 authenticators over every payload chunk. Two
//! wire-compatible major versions are supported; see [`Version`] for
//! where they diverge.
//!
//! The two entry points are [`encrypt`] and [`decrypt`]. Both are
//! synchronous, buffer the whole message, and share no state — calls
//! may run in parallel on separate threads. Armoring, key management,
//! and the signing modes of the wider format family live elsewhere.
//!
//! # Module Map
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`constants`] | Wire-format constants and nonce strings |
//! | [`errors`] | One error variant per failure mode |
//! | [`version`] | v1/v2 divergence points |
//! | [`crypto`] | NaCl box/secretbox adapter, keypairs |
//! | [`hash`] | SHA-512 and HMAC-SHA-512 |
//! | [`encoding`] | Hex for diagnostics and test vectors |
//! | `chunker` | Plaintext chunking and terminators |
//! | `wire` | MessagePack value plumbing |
//! | `header` | Header build/parse and header hash |
//! | `mac` | Per-recipient MAC-key derivation |
//! | `payload` | Packet seal/open |
//! | `encrypt` / `decrypt` | The two pipelines |

/// Wire-format constants — nonce strings, lengths, format name.
pub mod constants;

/// Error types for saltpack-core operations.
pub mod errors;

/// Format versions and their divergence points.
pub mod version;

/// Crypto primitives — NaCl box and secretbox over X25519.
pub mod crypto;

/// Hashing — SHA-512 and HMAC-SHA-512.
pub mod hash;

/// Hex encoding for diagnostics and test vectors.
pub mod encoding;

mod chunker;
mod decrypt;
mod encrypt;
mod header;
mod mac;
mod payload;
mod wire;

pub use crypto::{generate_keypair, public_from_secret, KeyPair};
pub use decrypt::decrypt;
pub use encrypt::encrypt;
pub use errors::SaltpackError;
pub use version::Version;
