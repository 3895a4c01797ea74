//! Header codec — build, double-encode, hash, and parse.
//!
//! The header is a MessagePack array of six elements:
//! `[format_name, [major, minor], mode, ephemeral_public, sender_secretbox,
//! recipient_pairs]`. On the wire it travels *double encoded*: the packed
//! array bytes are wrapped in a MessagePack `bin` object, so a decoder can
//! skip a header it does not fully understand as one length-prefixed blob.
//! The SHA-512 of the inner packed bytes is the header hash, which every
//! later packet authentication binds to.
//!
//! Both the header array and each recipient pair tolerate trailing
//! elements; the format is forward-compatible by appending.

use std::io::Read;

use rmpv::Value;
use zeroize::Zeroizing;

use crate::constants::{FORMAT_NAME, MODE_ENCRYPTION, SENDER_KEY_SECRETBOX_NONCE};
use crate::crypto::{self, KeyPair};
use crate::errors::SaltpackError;
use crate::version::Version;
use crate::wire;

/// One entry of the header's recipient list.
pub(crate) struct RecipientSlot {
    /// The recipient's public key, when the sender chose visible recipients.
    pub public_key: Option<[u8; 32]>,
    /// The payload key, boxed from the ephemeral key to this recipient.
    pub payload_key_box: Vec<u8>,
}

/// A parsed, validated header.
pub(crate) struct Header {
    pub version: Version,
    pub ephemeral_public: [u8; 32],
    pub sender_secretbox: Vec<u8>,
    pub recipients: Vec<RecipientSlot>,
    /// SHA-512 of the packed header array.
    pub hash: [u8; 64],
}

/// A freshly built header plus the per-message secrets minted with it.
pub(crate) struct SealedHeader {
    /// `msgpack_bin(header_bytes)` — the on-wire preamble.
    pub preamble: Vec<u8>,
    pub hash: [u8; 64],
    pub ephemeral: KeyPair,
    pub payload_key: Zeroizing<[u8; 32]>,
}

/// Build the header for a new message.
///
/// Mints the ephemeral keypair and payload key, seals the sender's public
/// key under the payload key, and boxes the payload key once per
/// recipient with the version's nonce for that slot.
pub(crate) fn seal(
    sender_secret: &[u8; 32],
    recipient_publics: &[[u8; 32]],
    visible_recipients: bool,
    version: Version,
) -> Result<SealedHeader, SaltpackError> {
    let sender_public = crypto::public_from_secret(sender_secret);
    let ephemeral = crypto::generate_keypair();
    let payload_key = Zeroizing::new(crypto::random_key());

    let sender_secretbox =
        crypto::secretbox_seal(&sender_public, SENDER_KEY_SECRETBOX_NONCE, &payload_key)?;

    let mut recipient_pairs = Vec::with_capacity(recipient_publics.len());
    for (index, recipient_public) in recipient_publics.iter().enumerate() {
        let payload_key_box = crypto::box_seal(
            payload_key.as_slice(),
            &version.payload_key_box_nonce(index as u64),
            recipient_public,
            &ephemeral.secret_key,
        )?;
        let public = if visible_recipients {
            Value::Binary(recipient_public.to_vec())
        } else {
            Value::Nil
        };
        recipient_pairs.push(Value::Array(vec![public, Value::Binary(payload_key_box)]));
    }

    let header = Value::Array(vec![
        Value::from(FORMAT_NAME),
        Value::Array(vec![
            Value::from(version.major()),
            Value::from(version.minor()),
        ]),
        Value::from(MODE_ENCRYPTION),
        Value::Binary(ephemeral.public_key.to_vec()),
        Value::Binary(sender_secretbox),
        Value::Array(recipient_pairs),
    ]);

    let mut header_bytes = Vec::new();
    wire::write_value(&mut header_bytes, &header)?;
    let hash = crate::hash::sha512(&header_bytes);

    let mut preamble = Vec::new();
    wire::write_value(&mut preamble, &Value::Binary(header_bytes))?;

    Ok(SealedHeader {
        preamble,
        hash,
        ephemeral,
        payload_key,
    })
}

/// Read and validate the header at the front of a message stream.
///
/// # Errors
/// `BadFormat`, `BadVersion`, and `BadMode` for the three header
/// validations; `Malformed` for everything structural.
pub(crate) fn parse(rd: &mut impl Read) -> Result<Header, SaltpackError> {
    let header_bytes = wire::expect_bin(wire::read_value(rd)?, "header")?;
    let hash = crate::hash::sha512(&header_bytes);

    let header = wire::read_value(&mut header_bytes.as_slice())?;
    let mut elements = wire::into_elements(header, "header")?;

    let format_value = wire::next_element(&mut elements, "format name")?;
    let format_name = wire::expect_str(&format_value, "format name")?;
    if format_name != FORMAT_NAME {
        return Err(SaltpackError::BadFormat(format_name.to_owned()));
    }

    let mut version_pair = wire::into_elements(
        wire::next_element(&mut elements, "version pair")?,
        "version pair",
    )?;
    let major = wire::expect_int(&wire::next_element(&mut version_pair, "major version")?, "major version")?;
    let version = Version::from_major(major).ok_or(SaltpackError::BadVersion(major))?;
    // The minor number must be present and an integer, but any value is fine.
    wire::expect_int(&wire::next_element(&mut version_pair, "minor version")?, "minor version")?;

    let mode = wire::expect_int(&wire::next_element(&mut elements, "mode")?, "mode")?;
    if mode != MODE_ENCRYPTION {
        return Err(SaltpackError::BadMode(mode));
    }

    let ephemeral_public = wire::expect_bin32(
        wire::next_element(&mut elements, "ephemeral public key")?,
        "ephemeral public key",
    )?;
    let sender_secretbox =
        wire::expect_bin(wire::next_element(&mut elements, "sender secretbox")?, "sender secretbox")?;

    let recipient_list = wire::into_elements(
        wire::next_element(&mut elements, "recipient list")?,
        "recipient list",
    )?;
    let mut recipients = Vec::new();
    for pair in recipient_list {
        let mut pair = wire::into_elements(pair, "recipient pair")?;
        let public_key = match wire::next_element(&mut pair, "recipient public key")? {
            Value::Nil => None,
            value => Some(wire::expect_bin32(value, "recipient public key")?),
        };
        let payload_key_box =
            wire::expect_bin(wire::next_element(&mut pair, "payload key box")?, "payload key box")?;
        recipients.push(RecipientSlot {
            public_key,
            payload_key_box,
        });
    }

    Ok(Header {
        version,
        ephemeral_public,
        sender_secretbox,
        recipients,
        hash,
    })
}
