//! The two physical formats and their shared byte primitives.
//!
//! - [`tree`]: values as [`Node`](crate::Node) trees, keyed by field name
//! - [`buf`]: values as positional flat byte buffers

pub mod buf;
pub mod primitives;
pub mod tree;

pub use buf::{BufDecoder, BufEncoder};
pub use primitives::{Reader, Writer};
pub use tree::{NbtConfig, SIZE_KEY, TreeDecoder, TreeEncoder, VALUE_KEY};
