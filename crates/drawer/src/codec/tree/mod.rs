//! Compound-tree codec.
//!
//! Values map onto [`Node`]s: structs become compounds keyed by field name,
//! sequences become lists, `None` becomes the `End` sentinel.
//!
//! # Layout decisions
//!
//! - Maps with primitive or enum keys become compounds keyed by the key's
//!   string form; maps with composite keys become a list alternating key and
//!   value nodes.
//! - Sequences whose elements are `Option`s become a compound holding only the
//!   present slots under their index, plus an Int `"size"` entry when
//!   [`NbtConfig::explicit_list_size`] is on.
//! - Data-carrying enum variants carry their serial name under the class
//!   discriminator. Struct payloads get it injected next to their own fields;
//!   any other payload is stored under `"value"`.
//! - A map value stored as a String where a structure is expected is read as
//!   inline JSON.

mod decoder;
mod encoder;
mod map_key;

pub use decoder::TreeDecoder;
pub use encoder::{CompositeEncoder, TreeEncoder};

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::model::Node;
use crate::schema::SerializersModule;
use crate::tagged::{PrimitiveSlot, TagStack};

/// Key of the explicit length entry in a nullable list compound.
pub const SIZE_KEY: &str = "size";

/// Key holding a non-struct polymorphic payload.
pub const VALUE_KEY: &str = "value";

/// Tree codec options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NbtConfig {
    /// Write a `"size"` entry into nullable list compounds so trailing nulls
    /// survive a round trip.
    pub explicit_list_size: bool,
}

impl Default for NbtConfig {
    fn default() -> Self {
        Self {
            explicit_list_size: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Context<'a> {
    pub module: &'a SerializersModule,
    pub config: NbtConfig,
}

/// Encodes a value into a node.
pub(crate) fn encode<T: ?Sized + Serialize>(cx: Context<'_>, value: &T) -> Result<Node, EncodeError> {
    let mut tags = TagStack::new();
    let mut root = PrimitiveSlot::new();
    root.record(value.serialize(TreeEncoder::with_context(cx, &mut tags))?)?;
    Ok(root.finish()?)
}

/// Decodes a value from a node.
pub(crate) fn decode<'de, T: Deserialize<'de>>(
    cx: Context<'_>,
    node: &'de Node,
) -> Result<T, DecodeError> {
    let mut tags = TagStack::new();
    T::deserialize(TreeDecoder::with_context(cx, &mut tags, node))
}
