//! Leaf types with a fixed physical form.
//!
//! - [`BlockPos`]: one packed i64
//! - [`Identifier`]: one `namespace:path` string
//! - [`uuid`]: a `{most, least}` structure of i64 halves
//! - [`Vec3d`]: three f64 fields

mod block_pos;
mod identifier;
pub mod uuid;
mod vec3d;

pub use block_pos::BlockPos;
pub use identifier::{DEFAULT_NAMESPACE, Identifier, IdentifierError};
pub use self::uuid::SerialUuid;
pub use vec3d::Vec3d;
