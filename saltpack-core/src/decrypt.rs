//! Decrypt pipeline — parse, find our slot, verify and open packets.

use tracing::debug;
use zeroize::Zeroizing;

use crate::constants::SENDER_KEY_SECRETBOX_NONCE;
use crate::crypto::SharedBox;
use crate::errors::SaltpackError;
use crate::payload::PacketOpener;
use crate::{crypto, header, mac};

/// Decrypt a message with one recipient's private key.
///
/// Walks the header's recipient list, opening each payload-key box
/// against the precomputed ephemeral shared secret until one yields;
/// the position of that slot then drives nonce and MAC-key derivation
/// for the rest of the message. Packets are verified and appended until
/// the version's terminator; trailing bytes after it are ignored.
///
/// # Errors
/// `BadFormat` / `BadVersion` / `BadMode` for a header this crate does
/// not speak, `NoMatchingRecipient` when the key opens no slot,
/// `HmacFailure` or `CryptoFailure` for a damaged or forged packet, and
/// `Malformed` for structural problems.
pub fn decrypt(ciphertext: &[u8], recipient_secret: &[u8; 32]) -> Result<Vec<u8>, SaltpackError> {
    let mut stream = ciphertext;
    let parsed = header::parse(&mut stream)?;
    let version = parsed.version;

    // Recipient discovery: failure per slot is expected, not an error.
    let shared = SharedBox::new(&parsed.ephemeral_public, recipient_secret);
    let mut matched = None;
    for (index, slot) in parsed.recipients.iter().enumerate() {
        if let Some(key) = shared.try_open(
            &slot.payload_key_box,
            &version.payload_key_box_nonce(index as u64),
        ) {
            matched = Some((index, key));
            break;
        }
    }
    let Some((recipient_index, payload_key)) = matched else {
        return Err(SaltpackError::NoMatchingRecipient);
    };
    let payload_key: Zeroizing<[u8; 32]> = Zeroizing::new(
        payload_key
            .try_into()
            .map_err(|key: Vec<u8>| {
                SaltpackError::Malformed(format!("payload key: expected 32 bytes, found {}", key.len()))
            })?,
    );
    debug!(recipient_index, major = version.major(), "matched recipient slot");

    let sender_public: [u8; 32] = crypto::secretbox_open(
        &parsed.sender_secretbox,
        SENDER_KEY_SECRETBOX_NONCE,
        &payload_key,
    )?
    .try_into()
    .map_err(|key: Vec<u8>| {
        SaltpackError::Malformed(format!("sender key: expected 32 bytes, found {}", key.len()))
    })?;

    let mac_key = mac::derive_for_recipient(
        version,
        &parsed.hash,
        recipient_index as u64,
        &sender_public,
        &parsed.ephemeral_public,
        recipient_secret,
    )?;

    let opener = PacketOpener {
        version,
        header_hash: &parsed.hash,
        payload_key: &payload_key,
        mac_key: &mac_key,
        recipient_index,
    };

    let mut output = Vec::new();
    let mut chunk_index = 0u64;
    loop {
        let chunk = opener.open(&mut stream, chunk_index)?;
        output.extend_from_slice(&chunk.plaintext);
        if chunk.last {
            break;
        }
        chunk_index += 1;
    }

    debug!(packets = chunk_index + 1, bytes = output.len(), "opened message");
    Ok(output)
}
