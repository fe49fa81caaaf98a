//! Error types for tree and flat-buffer encoding/decoding.

use std::fmt;

use serde::{de, ser};
use thiserror::Error;

use crate::model::NodeKind;
use crate::tagged::{SlotMisuse, TagStackUnderflow};

/// Error classes shared by both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Physical data disagrees with the expected shape
    TypeMismatch,
    /// E002: Flat buffer ended before the value did
    BufferUnderrun,
    /// E003: Container key rules violated
    KeyViolation,
    /// E004: Invalid UTF-8 encoding
    InvalidUtf8,
    /// E005: Malformed varint/length/marker
    MalformedEncoding,
    /// E006: Codec used outside its contract
    ContractViolation,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::TypeMismatch => "E001",
            ErrorCode::BufferUnderrun => "E002",
            ErrorCode::KeyViolation => "E003",
            ErrorCode::InvalidUtf8 => "E004",
            ErrorCode::MalformedEncoding => "E005",
            ErrorCode::ContractViolation => "E006",
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

/// Error during decoding from a node tree or a flat buffer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001: Shape mismatch ===
    #[error("[E001] type mismatch at {}: expected {expected}, found {found}", display_path(.path))]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("[E001] invalid value at {}: {message}", display_path(.path))]
    InvalidValue { path: String, message: String },

    #[error("[E001] invalid length {len} at {}, expected {expected}", display_path(.path))]
    InvalidLength {
        path: String,
        len: usize,
        expected: String,
    },

    #[error("[E001] missing field `{field}` at {}", display_path(.path))]
    MissingField { path: String, field: &'static str },

    #[error("[E001] unknown variant `{variant}` at {}, expected one of [{expected}]", display_path(.path))]
    UnknownVariant {
        path: String,
        variant: String,
        expected: String,
    },

    #[error("[E001] polymorphic value at {} has no `{key}` discriminator", display_path(.path))]
    MissingDiscriminator { path: String, key: String },

    #[error("[E001] inline text value could not be decoded: {message}")]
    InlineText { message: String },

    // === E002: Underrun ===
    #[error("[E002] unexpected end of buffer while reading {context}")]
    BufferUnderrun { context: &'static str },

    // === E004: Invalid UTF-8 ===
    #[error("[E004] invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    // === E005: Malformed encoding ===
    #[error("[E005] varint exceeds maximum length (5 bytes)")]
    VarintTooLong,

    #[error("[E005] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("[E005] {field} length is negative: {len}")]
    NegativeLength { field: &'static str, len: i32 },

    #[error("[E005] invalid null marker: {value} (expected 0x00 or 0x01)")]
    InvalidMarker { value: u8 },

    #[error("[E005] invalid bool value: {value} (expected 0x00 or 0x01)")]
    InvalidBool { value: u8 },

    #[error("[E005] invalid char scalar value: {value:#x}")]
    InvalidChar { value: u32 },

    #[error("[E005] {remaining} trailing bytes after value")]
    TrailingBytes { remaining: usize },

    // === E006: Contract violations ===
    #[error("[E006] flat buffers are not self-describing, cannot decode {context} without a schema")]
    NotSelfDescribing { context: &'static str },

    #[error("[E006] {0}")]
    TagStack(#[from] TagStackUnderflow),

    #[error("[E006] {0}")]
    Message(String),
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::TypeMismatch { .. }
            | DecodeError::InvalidValue { .. }
            | DecodeError::InvalidLength { .. }
            | DecodeError::MissingField { .. }
            | DecodeError::UnknownVariant { .. }
            | DecodeError::MissingDiscriminator { .. }
            | DecodeError::InlineText { .. } => ErrorCode::TypeMismatch,
            DecodeError::BufferUnderrun { .. } => ErrorCode::BufferUnderrun,
            DecodeError::InvalidUtf8 { .. } => ErrorCode::InvalidUtf8,
            DecodeError::NotSelfDescribing { .. }
            | DecodeError::TagStack(_)
            | DecodeError::Message(_) => ErrorCode::ContractViolation,
            _ => ErrorCode::MalformedEncoding,
        }
    }

    /// Builds a type mismatch between an expected shape and a physical node kind.
    pub(crate) fn mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        DecodeError::TypeMismatch {
            path: String::new(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Attaches the tag path of the element being decoded.
    ///
    /// The innermost path wins: errors that already carry a path are left as is.
    pub fn at(mut self, tag: &str) -> Self {
        match &mut self {
            DecodeError::TypeMismatch { path, .. }
            | DecodeError::InvalidValue { path, .. }
            | DecodeError::InvalidLength { path, .. }
            | DecodeError::MissingField { path, .. }
            | DecodeError::UnknownVariant { path, .. }
            | DecodeError::MissingDiscriminator { path, .. }
                if path.is_empty() =>
            {
                tag.clone_into(path);
            }
            _ => {}
        }
        self
    }

    /// Returns the tag path this error was raised at, if known.
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::TypeMismatch { path, .. }
            | DecodeError::InvalidValue { path, .. }
            | DecodeError::InvalidLength { path, .. }
            | DecodeError::MissingField { path, .. }
            | DecodeError::UnknownVariant { path, .. }
            | DecodeError::MissingDiscriminator { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::Message(msg.to_string())
    }

    fn invalid_type(unexp: de::Unexpected, exp: &dyn de::Expected) -> Self {
        DecodeError::mismatch(exp, unexp)
    }

    fn invalid_value(unexp: de::Unexpected, exp: &dyn de::Expected) -> Self {
        DecodeError::InvalidValue {
            path: String::new(),
            message: format!("{unexp}, expected {exp}"),
        }
    }

    fn invalid_length(len: usize, exp: &dyn de::Expected) -> Self {
        DecodeError::InvalidLength {
            path: String::new(),
            len,
            expected: exp.to_string(),
        }
    }

    fn unknown_variant(variant: &str, expected: &'static [&'static str]) -> Self {
        DecodeError::UnknownVariant {
            path: String::new(),
            variant: variant.to_owned(),
            expected: expected.join(", "),
        }
    }

    fn missing_field(field: &'static str) -> Self {
        DecodeError::MissingField {
            path: String::new(),
            field,
        }
    }
}

/// Error during encoding into a node tree or a flat buffer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("[E003] key {key:?} is already present in the target compound")]
    DuplicateKey { key: String },

    #[error("[E003] map key at {} is a {kind} node, map keys must be primitive or enum values", display_path(.path))]
    InvalidKeyKind { kind: NodeKind, path: String },

    #[error("[E003] field {key:?} at {} collides with the class discriminator", display_path(.path))]
    DiscriminatorConflict { key: String, path: String },

    #[error("[E005] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("[E006] flat buffers need the length of every {context} up front")]
    UnknownLength { context: &'static str },

    #[error("[E006] {0}")]
    PrimitiveSlot(#[from] SlotMisuse),

    #[error("[E006] {0}")]
    TagStack(#[from] TagStackUnderflow),

    #[error("[E006] {0}")]
    Message(String),
}

impl EncodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EncodeError::DuplicateKey { .. }
            | EncodeError::InvalidKeyKind { .. }
            | EncodeError::DiscriminatorConflict { .. } => ErrorCode::KeyViolation,
            EncodeError::LengthExceedsLimit { .. } => ErrorCode::MalformedEncoding,
            _ => ErrorCode::ContractViolation,
        }
    }
}

impl ser::Error for EncodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        EncodeError::Message(msg.to_string())
    }
}
