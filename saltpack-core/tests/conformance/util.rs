//! Shared fixtures for the conformance tests.

use rmpv::Value;
use saltpack_core::public_from_secret;

/// Deterministic secret key: 32 copies of one byte.
pub fn secret(byte: u8) -> [u8; 32] {
    [byte; 32]
}

/// Public key for [`secret`].
pub fn public(byte: u8) -> [u8; 32] {
    public_from_secret(&secret(byte))
}

/// Read every MessagePack value off a stream; the first is the
/// double-encoded header, the rest are payload packets.
pub fn read_stream(mut bytes: &[u8]) -> Vec<Value> {
    let mut values = Vec::new();
    while !bytes.is_empty() {
        values.push(rmpv::decode::read_value(&mut bytes).expect("valid MessagePack stream"));
    }
    values
}

/// Decode the header preamble into the packed header array.
pub fn decode_header(preamble: &Value) -> Value {
    let Value::Binary(header_bytes) = preamble else {
        panic!("header preamble must be a bin, found {preamble}");
    };
    rmpv::decode::read_value(&mut header_bytes.as_slice()).expect("valid packed header")
}
