//! Format-agnostic traversal state shared by the codecs.
//!
//! - [`TagStack`] and [`compose`]: the dotted path of the element being visited
//! - [`ElementCursor`]: which declared field a decoder visits next
//! - [`PrimitiveSlot`]: the single value produced where no key exists
//! - [`StructureKind`] and [`MapMode`]: which codec handles a nested structure

mod cursor;
mod path;
mod slot;
mod structure;

pub use cursor::ElementCursor;
pub use path::{PATH_SEPARATOR, TagStack, TagStackUnderflow, compose};
pub use slot::{PrimitiveSlot, SlotMisuse};
pub use structure::{MapMode, StructureKind};
