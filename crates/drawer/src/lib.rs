//! Drawer: serde formats for NBT-style compound trees and flat buffers.
//!
//! Any type implementing `Serialize`/`Deserialize` can be stored two ways:
//! - as a [`Node`] tree, where structs are string-keyed [`Compound`]s and
//!   missing fields fall back to their serde defaults
//! - as a flat, positional byte buffer with length-prefixed collections
//!
//! # Quick Start
//!
//! ```rust
//! use drawer::{Compound, Node, get_from, put};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct City {
//!     id: i32,
//!     name: String,
//! }
//!
//! let mut data = Compound::new();
//! let city = City { id: 1, name: "Bar".into() };
//!
//! // Stored under the type name unless a key is given.
//! put(Some(&city), &mut data, None, None).unwrap();
//! assert!(data.contains_key("City"));
//! assert_eq!(data.get("City").unwrap().as_compound().unwrap().get("id"), Some(&Node::Int(1)));
//!
//! let back: City = get_from(&data, None, None).unwrap();
//! assert_eq!(back, city);
//!
//! // Flat buffers.
//! let bytes = drawer::to_bytes(&city).unwrap();
//! assert_eq!(drawer::from_bytes::<City>(&bytes).unwrap(), city);
//! ```
//!
//! # Modules
//!
//! - [`model`]: the node tree (`Node`, `Compound`, `NodeList`)
//! - [`schema`]: type descriptors and the polymorphic serializers module
//! - [`tagged`]: traversal state shared by both codecs (tag paths, cursors)
//! - [`codec`]: the tree and flat codecs
//! - [`format`]: `put`/`get_from`/`write`/`read_from` entry points
//! - [`adapters`]: leaf types with a fixed physical form
//! - [`error`]: error types
//! - [`limits`]: decode-time bounds
//!
//! # Polymorphism
//!
//! Data-carrying enum variants are stored as compounds holding the variant's
//! serial name under a class discriminator (`"type"` by default). A
//! [`SerializersModule`] renames variants and the discriminator key; pass one
//! as context and it is layered over [`DEFAULT_MODULE`].
//!
//! # Security
//!
//! Flat buffers are untrusted input: every length is checked against
//! [`limits::BufLimits`] before allocation and reads past the end fail with
//! [`DecodeError::BufferUnderrun`].

pub mod adapters;
pub mod codec;
pub mod error;
pub mod format;
pub mod limits;
pub mod model;
pub mod schema;
pub mod tagged;

#[cfg(test)]
mod proptest_tests;
#[cfg(test)]
mod test_data;

pub use codec::{NbtConfig, Reader, Writer};
pub use error::{DecodeError, EncodeError, ErrorCode};
pub use format::{Nbt, from_bytes, from_node, get_from, put, read_from, to_bytes, to_node, write};
pub use model::{Compound, NULL, Node, NodeKind, NodeList};
pub use schema::{DEFAULT_MODULE, Descriptor, ElementKind, SerializersModule};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
