//! Hex encoding — trace output and test vectors.
//!
//! The wire format itself is binary MessagePack; hex only ever appears
//! in diagnostics and in known-answer tests.

use crate::errors::SaltpackError;

/// Encode bytes to a lowercase hex string.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string to bytes.
///
/// # Errors
/// Returns `SaltpackError::Malformed` on odd length or non-hex characters.
pub fn from_hex(encoded: &str) -> Result<Vec<u8>, SaltpackError> {
    if encoded.len() % 2 != 0 {
        return Err(SaltpackError::Malformed("odd-length hex string".into()));
    }
    (0..encoded.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&encoded[i..i + 2], 16)
                .map_err(|e| SaltpackError::Malformed(format!("invalid hex: {e}")))
        })
        .collect()
}
