//! Conformance: wire structure per version.
//!
//! Cracks the emitted stream open with `rmpv` and checks the packed
//! shapes directly: header fields, packet arity, terminator packets,
//! and that a header rewritten to the other major version no longer
//! decrypts.

use rmpv::Value;
use saltpack_core::{decrypt, encrypt, Version};

use crate::util::{decode_header, public, read_stream, secret};

/// Header array: format name, version pair, mode, and recipient count.
#[test]
fn conformance_header_structure() {
    for (version, expected_major) in [(Version::V1, 1u64), (Version::V2, 2u64)] {
        let encrypted = encrypt(
            &secret(0),
            &[public(1), public(2)],
            b"structure",
            1_000,
            false,
            version,
        )
        .unwrap();
        let stream = read_stream(&encrypted);
        let header = decode_header(&stream[0]);

        let Value::Array(elements) = header else {
            panic!("header must be an array");
        };
        assert_eq!(elements.len(), 6);
        assert_eq!(elements[0].as_str(), Some("saltpack"));
        assert_eq!(
            elements[1],
            Value::Array(vec![Value::from(expected_major), Value::from(0u64)])
        );
        assert_eq!(elements[2].as_u64(), Some(0));
        assert_eq!(elements[3].as_slice().map(<[u8]>::len), Some(32));
        assert!(matches!(elements[4], Value::Binary(_)));

        let Value::Array(recipients) = &elements[5] else {
            panic!("recipient list must be an array");
        };
        assert_eq!(recipients.len(), 2);
        for pair in recipients {
            let Value::Array(pair) = pair else {
                panic!("recipient pair must be an array");
            };
            assert_eq!(pair[0], Value::Nil);
            assert!(matches!(pair[1], Value::Binary(_)));
        }
    }
}

/// Visible recipients put the public keys on the wire.
#[test]
fn conformance_header_visible_recipients() {
    let encrypted = encrypt(
        &secret(0),
        &[public(1)],
        b"",
        1_000,
        true,
        Version::V2,
    )
    .unwrap();
    let header = decode_header(&read_stream(&encrypted)[0]);

    let Value::Array(elements) = header else {
        panic!("header must be an array");
    };
    let Value::Array(recipients) = &elements[5] else {
        panic!("recipient list must be an array");
    };
    let Value::Array(pair) = &recipients[0] else {
        panic!("recipient pair must be an array");
    };
    assert_eq!(pair[0], Value::Binary(public(1).to_vec()));
}

/// v2 emits one packet per chunk, flagging only the last; v1 appends an
/// empty terminator packet instead.
#[test]
fn conformance_packet_counts_and_terminators() {
    let message = b"long message".repeat(10_000); // 120_000 bytes
    let chunk_size = 1_000;

    let v2 = encrypt(&secret(0), &[public(1)], &message, chunk_size, false, Version::V2).unwrap();
    let stream = read_stream(&v2);
    let packets = &stream[1..];
    assert_eq!(packets.len(), 120);
    for (index, packet) in packets.iter().enumerate() {
        let Value::Array(elements) = packet else {
            panic!("packet must be an array");
        };
        assert_eq!(elements.len(), 3, "v2 packet arity");
        assert_eq!(
            elements[0].as_bool(),
            Some(index == packets.len() - 1),
            "only the last v2 packet carries the final flag"
        );
    }

    let v1 = encrypt(&secret(0), &[public(1)], &message, chunk_size, false, Version::V1).unwrap();
    let stream = read_stream(&v1);
    let packets = &stream[1..];
    assert_eq!(packets.len(), 121, "120 data packets plus the terminator");
    for packet in packets {
        let Value::Array(elements) = packet else {
            panic!("packet must be an array");
        };
        assert_eq!(elements.len(), 2, "v1 packet arity");
    }
    // The terminator secretbox holds an empty chunk: tag only.
    let Value::Array(last) = &packets[120] else {
        panic!("packet must be an array");
    };
    assert_eq!(last[1].as_slice().map(<[u8]>::len), Some(16));
}

/// Rewriting the header's major version makes the message undecryptable:
/// nonces and MAC keys all follow the version, and none of them line up
/// under the other one.
#[test]
fn conformance_forced_version_fails() {
    for (from, to) in [(Version::V1, 2u64), (Version::V2, 1u64)] {
        let encrypted = encrypt(&secret(0), &[public(1)], b"foo bar", 1_000, false, from).unwrap();

        // Re-encode the preamble with the major number swapped.
        let mut rest = encrypted.as_slice();
        let preamble = rmpv::decode::read_value(&mut rest).unwrap();
        let mut header = decode_header(&preamble);
        if let Value::Array(elements) = &mut header {
            elements[1] = Value::Array(vec![Value::from(to), Value::from(0u64)]);
        }
        let mut header_bytes = Vec::new();
        rmpv::encode::write_value(&mut header_bytes, &header).unwrap();
        let mut forced = Vec::new();
        rmpv::encode::write_value(&mut forced, &Value::Binary(header_bytes)).unwrap();
        forced.extend_from_slice(rest);

        assert!(
            decrypt(&forced, &secret(1)).is_err(),
            "v{} message accepted under the v{to} path",
            from.major()
        );
    }
}
