//! Conformance: tamper and truncation detection.
//!
//! A single recipient is used throughout so that every byte of the
//! stream is load-bearing: header bytes are bound by the header hash,
//! the one authenticator is always checked, and the secretbox covers
//! the rest.

use saltpack_core::{decrypt, encrypt, SaltpackError, Version};

use crate::util::{public, secret};

fn encrypted_fixture(version: Version) -> Vec<u8> {
    encrypt(
        &secret(0),
        &[public(1)],
        b"foo bar",
        1_000,
        false,
        version,
    )
    .unwrap()
}

/// Flipping the last byte of the stream trips packet verification.
#[test]
fn conformance_last_byte_flip_rejected() {
    let mut tampered = encrypted_fixture(Version::V2);
    *tampered.last_mut().unwrap() ^= 0x01;

    let result = decrypt(&tampered, &secret(1));
    assert!(
        matches!(
            result,
            Err(SaltpackError::HmacFailure) | Err(SaltpackError::CryptoFailure(_))
        ),
        "expected an authentication failure, got {result:?}"
    );
}

/// Single-bit flips anywhere in the stream are never silent.
#[test]
fn conformance_bit_flip_sweep_rejected() {
    for version in [Version::V1, Version::V2] {
        let encrypted = encrypted_fixture(version);

        for position in 0..encrypted.len() {
            let mut tampered = encrypted.clone();
            tampered[position] ^= 0x01;

            match decrypt(&tampered, &secret(1)) {
                Err(_) => {}
                Ok(plaintext) => {
                    // A flip that still decrypts must not corrupt output.
                    // (No known position does; keep the failure readable.)
                    assert_eq!(
                        plaintext, b"foo bar",
                        "byte {position} flip silently corrupted the message"
                    );
                    panic!("byte {position} flip was not detected");
                }
            }
        }
    }
}

/// Truncating the stream mid-packet is malformed, not a short read.
#[test]
fn conformance_truncation_rejected() {
    let encrypted = encrypted_fixture(Version::V2);

    for keep in [encrypted.len() - 1, encrypted.len() - 10] {
        let result = decrypt(&encrypted[..keep], &secret(1));
        assert!(
            matches!(result, Err(SaltpackError::Malformed(_))),
            "truncated stream accepted: {result:?}"
        );
    }
}

/// A header with no packets behind it is malformed.
#[test]
fn conformance_missing_packets_rejected() {
    let encrypted = encrypted_fixture(Version::V2);

    // Keep exactly the header preamble: one MessagePack bin value.
    let mut rest = encrypted.as_slice();
    rmpv::decode::read_value(&mut rest).unwrap();
    let header_len = encrypted.len() - rest.len();

    let result = decrypt(&encrypted[..header_len], &secret(1));
    assert!(matches!(result, Err(SaltpackError::Malformed(_))));
}

/// Swapping two packets moves their nonces and fails authentication.
#[test]
fn conformance_packet_reorder_rejected() {
    // Two data packets plus the v2 final packet.
    let encrypted = encrypt(
        &secret(0),
        &[public(1)],
        &b"x".repeat(300),
        100,
        false,
        Version::V2,
    )
    .unwrap();

    // Split the stream into its MessagePack items.
    let mut boundaries = Vec::new();
    let mut rest = encrypted.as_slice();
    while !rest.is_empty() {
        let before = rest.len();
        rmpv::decode::read_value(&mut rest).unwrap();
        boundaries.push(encrypted.len() - before..encrypted.len() - rest.len());
    }
    assert_eq!(boundaries.len(), 4, "header plus three packets");

    let mut reordered = encrypted[boundaries[0].clone()].to_vec();
    reordered.extend_from_slice(&encrypted[boundaries[2].clone()]);
    reordered.extend_from_slice(&encrypted[boundaries[1].clone()]);
    reordered.extend_from_slice(&encrypted[boundaries[3].clone()]);

    let result = decrypt(&reordered, &secret(1));
    assert!(
        matches!(result, Err(SaltpackError::HmacFailure)),
        "reordered packets accepted: {result:?}"
    );
}
