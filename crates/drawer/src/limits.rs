//! Decode-time bounds.
//!
//! Lengths read from a flat buffer or a nullable list's size entry are
//! untrusted; every allocation they drive is checked against these limits
//! first.

/// Maximum string length in characters (the network string cap).
pub const MAX_STRING_LEN: usize = 32767;

/// Maximum encoded string length in bytes (4 UTF-8 bytes per char worst case).
pub const MAX_STRING_BYTES: usize = MAX_STRING_LEN * 4;

/// Maximum element count of a single collection or byte buffer.
pub const MAX_COLLECTION_LEN: usize = 1 << 24;

/// Maximum bytes in a VarInt (32-bit value).
pub const MAX_VARINT_BYTES: usize = 5;

/// Limits applied by [`BufDecoder`](crate::codec::BufDecoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufLimits {
    /// Maximum string length in characters.
    pub max_string_len: usize,
    /// Maximum element count of a collection.
    pub max_collection_len: usize,
}

impl Default for BufLimits {
    fn default() -> Self {
        Self {
            max_string_len: MAX_STRING_LEN,
            max_collection_len: MAX_COLLECTION_LEN,
        }
    }
}

impl BufLimits {
    /// Maximum encoded byte length for strings under these limits.
    pub fn max_string_bytes(&self) -> usize {
        self.max_string_len.saturating_mul(4)
    }
}
