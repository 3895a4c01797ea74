//! Encrypt pipeline — header, MAC keys, then one packet per chunk.

use tracing::debug;

use crate::chunker::Chunker;
use crate::errors::SaltpackError;
use crate::payload::PacketSealer;
use crate::version::Version;
use crate::{header, mac};

/// Encrypt `message` for every key in `recipient_publics`.
///
/// Returns the whole wire stream: the double-encoded header followed by
/// the payload packets, all on one buffer with no outer framing. The
/// ephemeral key and payload key are minted per call and zeroed before
/// returning.
///
/// An empty recipient list is accepted and produces a well-formed
/// message that nobody can decrypt.
///
/// # Panics
/// Panics if `chunk_size` is zero.
///
/// # Errors
/// `CryptoFailure` if an underlying primitive rejects its input.
pub fn encrypt(
    sender_secret: &[u8; 32],
    recipient_publics: &[[u8; 32]],
    message: &[u8],
    chunk_size: usize,
    visible_recipients: bool,
    version: Version,
) -> Result<Vec<u8>, SaltpackError> {
    let sealed = header::seal(sender_secret, recipient_publics, visible_recipients, version)?;
    let mac_keys = mac::derive_all(
        version,
        &sealed.hash,
        recipient_publics,
        sender_secret,
        &sealed.ephemeral.secret_key,
    )?;

    let sealer = PacketSealer {
        version,
        header_hash: &sealed.hash,
        payload_key: &sealed.payload_key,
        mac_keys: &mac_keys,
    };

    let mut output = sealed.preamble;
    let mut packets = 0u64;
    for chunk in Chunker::new(message, chunk_size, version) {
        output.extend_from_slice(&sealer.seal(&chunk)?);
        packets += 1;
    }

    debug!(
        packets,
        recipients = recipient_publics.len(),
        major = version.major(),
        "sealed message"
    );
    Ok(output)
}
