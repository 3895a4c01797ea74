//! MessagePack plumbing over the `rmpv` value model.
//!
//! The header and packets are mixed-type arrays with optional fields
//! and append-only forward compatibility, so decoding goes through
//! `rmpv::Value` and explicit destructuring rather than any
//! struct-shaped deserializer. Extra elements past the ones a shape
//! requires are ignored everywhere.

use std::io::Read;
use std::vec;

use rmpv::Value;

use crate::errors::SaltpackError;

/// Read one MessagePack value off the stream.
///
/// # Errors
/// Any parse failure, including a truncated stream, is `Malformed`.
pub(crate) fn read_value(rd: &mut impl Read) -> Result<Value, SaltpackError> {
    rmpv::decode::read_value(rd).map_err(|e| SaltpackError::Malformed(e.to_string()))
}

/// Append one MessagePack value to the output buffer.
pub(crate) fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<(), SaltpackError> {
    rmpv::encode::write_value(out, value).map_err(|e| SaltpackError::Malformed(e.to_string()))
}

/// Destructure an array value into an element iterator.
///
/// The iterator hands out leading elements via [`next_element`];
/// whatever the caller leaves unconsumed is the tolerated tail.
pub(crate) fn into_elements(
    value: Value,
    what: &str,
) -> Result<vec::IntoIter<Value>, SaltpackError> {
    match value {
        Value::Array(elements) => Ok(elements.into_iter()),
        other => Err(SaltpackError::Malformed(format!(
            "{what}: expected array, found {other}"
        ))),
    }
}

/// Pull the next required element out of an array.
pub(crate) fn next_element(
    elements: &mut vec::IntoIter<Value>,
    what: &str,
) -> Result<Value, SaltpackError> {
    elements
        .next()
        .ok_or_else(|| SaltpackError::Malformed(format!("{what}: missing")))
}

/// Require a byte string.
pub(crate) fn expect_bin(value: Value, what: &str) -> Result<Vec<u8>, SaltpackError> {
    match value {
        Value::Binary(bytes) => Ok(bytes),
        other => Err(SaltpackError::Malformed(format!(
            "{what}: expected bin, found {other}"
        ))),
    }
}

/// Require a byte string of exactly 32 bytes.
pub(crate) fn expect_bin32(value: Value, what: &str) -> Result<[u8; 32], SaltpackError> {
    let bytes = expect_bin(value, what)?;
    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| {
            SaltpackError::Malformed(format!("{what}: expected 32 bytes, found {}", bytes.len()))
        })
}

/// Require a boolean.
pub(crate) fn expect_bool(value: &Value, what: &str) -> Result<bool, SaltpackError> {
    value
        .as_bool()
        .ok_or_else(|| SaltpackError::Malformed(format!("{what}: expected bool, found {value}")))
}

/// Require an integer representable as i64.
pub(crate) fn expect_int(value: &Value, what: &str) -> Result<i64, SaltpackError> {
    value
        .as_i64()
        .ok_or_else(|| SaltpackError::Malformed(format!("{what}: expected integer, found {value}")))
}

/// Require a UTF-8 string.
pub(crate) fn expect_str<'a>(value: &'a Value, what: &str) -> Result<&'a str, SaltpackError> {
    value
        .as_str()
        .ok_or_else(|| SaltpackError::Malformed(format!("{what}: expected string, found {value}")))
}
