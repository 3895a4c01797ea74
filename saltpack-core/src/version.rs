//! Format versions and the points where they diverge.
//!
//! v1 and v2 differ in exactly three places: the payload-key box nonce,
//! MAC-key derivation, and the packet shape / end-of-message rule.
//! Everything version-dependent dispatches through [`Version`] instead
//! of scattering major-number checks across the pipeline.

use crate::constants::{PAYLOAD_KEY_BOX_NONCE_PREFIX_V2, PAYLOAD_KEY_BOX_NONCE_V1};

/// Major format version of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// v1: fixed payload-key nonce, single-box MAC keys, trailing empty
    /// chunk as terminator.
    V1,
    /// v2: per-recipient payload-key nonces, two-box MAC keys, explicit
    /// final flag on the last packet.
    V2,
}

impl Version {
    /// Version used when the caller has no reason to pick v1.
    pub const DEFAULT: Version = Version::V2;

    /// Map a header major number to a version, if supported.
    pub fn from_major(major: i64) -> Option<Version> {
        match major {
            1 => Some(Version::V1),
            2 => Some(Version::V2),
            _ => None,
        }
    }

    /// Major number emitted in the header version pair.
    pub fn major(self) -> u64 {
        match self {
            Version::V1 => 1,
            Version::V2 => 2,
        }
    }

    /// Minor number emitted in the header version pair.
    pub fn minor(self) -> u64 {
        // Both majors are currently at minor 0.
        0
    }

    /// True when payload packets carry a leading final-flag boolean.
    pub(crate) fn has_final_flag(self) -> bool {
        self == Version::V2
    }

    /// Nonce for the payload-key box of the recipient at `recipient_index`.
    ///
    /// v1 uses one fixed nonce for every recipient; v2 binds the nonce to
    /// the recipient's position in the header list.
    pub(crate) fn payload_key_box_nonce(self, recipient_index: u64) -> [u8; 24] {
        match self {
            Version::V1 => *PAYLOAD_KEY_BOX_NONCE_V1,
            Version::V2 => {
                let mut nonce = [0u8; 24];
                nonce[..16].copy_from_slice(PAYLOAD_KEY_BOX_NONCE_PREFIX_V2);
                nonce[16..].copy_from_slice(&recipient_index.to_be_bytes());
                nonce
            }
        }
    }
}
