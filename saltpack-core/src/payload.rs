//! Payload packets — seal a chunk for every recipient, open for one.
//!
//! Each chunk becomes one MessagePack packet: the chunk sealed in a
//! secretbox under the payload key, plus one truncated HMAC-SHA-512
//! authenticator per recipient over the packet hash. The packet hash
//! covers the header hash, the payload nonce, the v2 final-flag byte,
//! and the secretbox, so nothing about a packet's position or content
//! can move without every authenticator noticing.
//!
//! Packet shapes:
//! - v1: `[hash_authenticators, payload_secretbox]`
//! - v2: `[final_flag, hash_authenticators, payload_secretbox]`
//!
//! Trailing elements after the required ones are ignored.

use std::io::Read;

use rmpv::Value;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::chunker::Chunk;
use crate::constants::{AUTHENTICATOR_LENGTH, PAYLOAD_NONCE_PREFIX};
use crate::crypto;
use crate::errors::SaltpackError;
use crate::hash::{hmac_sha512, sha512};
use crate::version::Version;
use crate::wire;

/// Nonce for the payload secretbox of chunk `chunk_index`.
pub(crate) fn payload_nonce(chunk_index: u64) -> [u8; 24] {
    let mut nonce = [0u8; 24];
    nonce[..16].copy_from_slice(PAYLOAD_NONCE_PREFIX);
    nonce[16..].copy_from_slice(&chunk_index.to_be_bytes());
    nonce
}

/// The hash every recipient authenticates for one packet.
fn packet_hash(
    version: Version,
    header_hash: &[u8; 64],
    nonce: &[u8; 24],
    last: bool,
    payload_secretbox: &[u8],
) -> [u8; 64] {
    let mut input = Vec::with_capacity(64 + 24 + 1 + payload_secretbox.len());
    input.extend_from_slice(header_hash);
    input.extend_from_slice(nonce);
    if version.has_final_flag() {
        input.push(u8::from(last));
    }
    input.extend_from_slice(payload_secretbox);
    sha512(&input)
}

/// Truncated per-recipient authenticator over a packet hash.
fn authenticator(mac_key: &[u8; 32], packet_hash: &[u8; 64]) -> [u8; 32] {
    let mut tag = [0u8; AUTHENTICATOR_LENGTH];
    tag.copy_from_slice(&hmac_sha512(mac_key, packet_hash)[..AUTHENTICATOR_LENGTH]);
    tag
}

/// Seals chunks into packets on behalf of all recipients.
pub(crate) struct PacketSealer<'a> {
    pub version: Version,
    pub header_hash: &'a [u8; 64],
    pub payload_key: &'a [u8; 32],
    pub mac_keys: &'a [Zeroizing<[u8; 32]>],
}

impl PacketSealer<'_> {
    /// Encrypt and authenticate one chunk; returns the packed packet.
    pub(crate) fn seal(&self, chunk: &Chunk<'_>) -> Result<Vec<u8>, SaltpackError> {
        let nonce = payload_nonce(chunk.index);
        let payload_secretbox = crypto::secretbox_seal(chunk.data, &nonce, self.payload_key)?;
        let hash = packet_hash(
            self.version,
            self.header_hash,
            &nonce,
            chunk.last,
            &payload_secretbox,
        );

        let authenticators = Value::Array(
            self.mac_keys
                .iter()
                .map(|mac_key| Value::Binary(authenticator(mac_key, &hash).to_vec()))
                .collect(),
        );

        let packet = if self.version.has_final_flag() {
            Value::Array(vec![
                Value::Boolean(chunk.last),
                authenticators,
                Value::Binary(payload_secretbox),
            ])
        } else {
            Value::Array(vec![authenticators, Value::Binary(payload_secretbox)])
        };

        let mut out = Vec::new();
        wire::write_value(&mut out, &packet)?;
        Ok(out)
    }
}

/// A verified, decrypted chunk.
pub(crate) struct OpenedChunk {
    pub plaintext: Vec<u8>,
    /// True when this chunk terminates the message.
    pub last: bool,
}

/// Opens packets for one matched recipient.
pub(crate) struct PacketOpener<'a> {
    pub version: Version,
    pub header_hash: &'a [u8; 64],
    pub payload_key: &'a [u8; 32],
    pub mac_key: &'a [u8; 32],
    pub recipient_index: usize,
}

impl PacketOpener<'_> {
    /// Read, verify, and decrypt the packet for chunk `chunk_index`.
    ///
    /// The authenticator comparison is constant-time. Verification runs
    /// before the secretbox is touched; a packet that fails either check
    /// contributes no plaintext.
    pub(crate) fn open(
        &self,
        rd: &mut impl Read,
        chunk_index: u64,
    ) -> Result<OpenedChunk, SaltpackError> {
        let mut elements = wire::into_elements(wire::read_value(rd)?, "payload packet")?;

        let final_flag = if self.version.has_final_flag() {
            wire::expect_bool(&wire::next_element(&mut elements, "final flag")?, "final flag")?
        } else {
            false
        };

        let mut authenticators = wire::into_elements(
            wire::next_element(&mut elements, "hash authenticators")?,
            "hash authenticators",
        )?;
        let their_tag = authenticators.nth(self.recipient_index).ok_or_else(|| {
            SaltpackError::Malformed(format!(
                "hash authenticators: no entry for recipient {}",
                self.recipient_index
            ))
        })?;
        let their_tag = wire::expect_bin(their_tag, "hash authenticator")?;

        let payload_secretbox = wire::expect_bin(
            wire::next_element(&mut elements, "payload secretbox")?,
            "payload secretbox",
        )?;

        let nonce = payload_nonce(chunk_index);
        let hash = packet_hash(
            self.version,
            self.header_hash,
            &nonce,
            final_flag,
            &payload_secretbox,
        );
        let our_tag = authenticator(self.mac_key, &hash);
        if !bool::from(our_tag.ct_eq(&their_tag[..])) {
            return Err(SaltpackError::HmacFailure);
        }

        let plaintext = crypto::secretbox_open(&payload_secretbox, &nonce, self.payload_key)?;
        let last = match self.version {
            Version::V1 => plaintext.is_empty(),
            Version::V2 => final_flag,
        };
        Ok(OpenedChunk { plaintext, last })
    }
}
