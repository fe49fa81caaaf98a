//! Byte-level primitives for the flat buffer format.
//!
//! Fixed-width numbers are big-endian. String lengths use a 32-bit LEB128
//! VarInt; every other length is a 4-byte big-endian count.

use crate::error::DecodeError;
use crate::limits::MAX_VARINT_BYTES;

// =============================================================================
// DECODING
// =============================================================================

/// Reader over a byte slice.
///
/// Reads past the end fail with [`DecodeError::BufferUnderrun`].
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

macro_rules! read_be {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(&mut self, context: &'static str) -> Result<$ty, DecodeError> {
                let bytes = self.read_array::<{ std::mem::size_of::<$ty>() }>(context)?;
                Ok(<$ty>::from_be_bytes(bytes))
            }
        )*
    };
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(DecodeError::BufferUnderrun { context })?;
        self.pos += 1;
        Ok(byte)
    }

    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::BufferUnderrun { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    #[inline]
    fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, context)?);
        Ok(out)
    }

    read_be! {
        read_i16 => i16,
        read_i32 => i32,
        read_i64 => i64,
        read_u32 => u32,
        read_f32 => f32,
        read_f64 => f64,
    }

    #[inline]
    pub fn read_i8(&mut self, context: &'static str) -> Result<i8, DecodeError> {
        self.read_byte(context).map(|b| b as i8)
    }

    /// Reads a 32-bit VarInt.
    pub fn read_varint(&mut self, context: &'static str) -> Result<i32, DecodeError> {
        let mut result: u32 = 0;
        for i in 0..MAX_VARINT_BYTES {
            let byte = self.read_byte(context)?;
            result |= ((byte & 0x7F) as u32) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(result as i32);
            }
        }
        Err(DecodeError::VarintTooLong)
    }

    /// Reads a 4-byte element count, checked against `max`.
    pub fn read_len(&mut self, max: usize, field: &'static str) -> Result<usize, DecodeError> {
        let len = self.read_i32(field)?;
        let len = usize::try_from(len).map_err(|_| DecodeError::NegativeLength { field, len })?;
        if len > max {
            return Err(DecodeError::LengthExceedsLimit { field, len, max });
        }
        Ok(len)
    }

    /// Reads a VarInt-prefixed UTF-8 string of at most `max_chars` characters.
    pub fn read_str(&mut self, max_chars: usize, field: &'static str) -> Result<&'a str, DecodeError> {
        let len = self.read_varint(field)?;
        let len = usize::try_from(len).map_err(|_| DecodeError::NegativeLength { field, len })?;
        let max_bytes = max_chars.saturating_mul(4);
        if len > max_bytes {
            return Err(DecodeError::LengthExceedsLimit { field, len, max: max_bytes });
        }
        let bytes = self.read_bytes(len, field)?;
        let s = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { field })?;
        let chars = s.chars().count();
        if chars > max_chars {
            return Err(DecodeError::LengthExceedsLimit { field, len: chars, max: max_chars });
        }
        Ok(s)
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Growable output buffer.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

macro_rules! write_be {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(&mut self, value: $ty) {
                self.buf.extend_from_slice(&value.to_be_bytes());
            }
        )*
    };
}

impl Writer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    write_be! {
        write_i16 => i16,
        write_i32 => i32,
        write_i64 => i64,
        write_u32 => u32,
        write_f32 => f32,
        write_f64 => f64,
    }

    /// Writes a 32-bit VarInt.
    pub fn write_varint(&mut self, value: i32) {
        let mut value = value as u32;
        let mut buf = [0u8; MAX_VARINT_BYTES];
        let mut len = 0;
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            buf[len] = byte;
            len += 1;
            if value == 0 {
                break;
            }
        }
        self.buf.extend_from_slice(&buf[..len]);
    }

    /// Writes a 4-byte element count.
    pub fn write_len(&mut self, len: usize) {
        self.write_i32(len as i32);
    }

    /// Writes a VarInt-prefixed UTF-8 string.
    pub fn write_str(&mut self, s: &str) {
        self.write_varint(s.len() as i32);
        self.buf.extend_from_slice(s.as_bytes());
    }
}
