//! Tree data model.
//!
//! A document is a [`Node`]; structured values become [`Compound`]s keyed by
//! field name and sequences become [`NodeList`]s.

mod compound;
mod node;
mod repr;

pub use compound::{Compound, NodeList};
pub use node::{Node, NodeKind, NULL};

pub(crate) use repr::{INT_ARRAY_TOKEN, LONG_ARRAY_TOKEN, NODE_TOKEN};
