//! Schema reflection and the polymorphic registry.

mod descriptor;
mod module;

pub use descriptor::{Descriptor, ElementKind};
pub use module::{CLASS_DISCRIMINATOR, DEFAULT_MODULE, SerializersModule};
