//! Block coordinates packed into a single long.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

const XZ_BITS: u32 = 26;
const Y_BITS: u32 = 12;
const XZ_MASK: i64 = (1 << XZ_BITS) - 1;
const Y_MASK: i64 = (1 << Y_BITS) - 1;
const X_SHIFT: u32 = XZ_BITS + Y_BITS;
const Z_SHIFT: u32 = Y_BITS;

/// An integer block position.
///
/// Serializes as one i64: 26 bits of x, 26 bits of z, then 12 bits of y.
/// Coordinates outside those ranges wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn pack(self) -> i64 {
        ((self.x as i64 & XZ_MASK) << X_SHIFT)
            | ((self.z as i64 & XZ_MASK) << Z_SHIFT)
            | (self.y as i64 & Y_MASK)
    }

    pub fn unpack(packed: i64) -> Self {
        // Shift each field to the top, then back down to sign-extend it.
        let x = packed >> X_SHIFT;
        let z = (packed << XZ_BITS) >> (XZ_BITS + Y_BITS);
        let y = (packed << (64 - Y_BITS)) >> (64 - Y_BITS);
        Self {
            x: x as i32,
            y: y as i32,
            z: z as i32,
        }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Serialize for BlockPos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct("BlockPos", &self.pack())
    }
}

impl<'de> Deserialize<'de> for BlockPos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PackedVisitor;

        impl<'de> Visitor<'de> for PackedVisitor {
            type Value = BlockPos;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a packed block position")
            }

            fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<BlockPos, D::Error> {
                i64::deserialize(deserializer).map(BlockPos::unpack)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<BlockPos, E> {
                Ok(BlockPos::unpack(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<BlockPos, E> {
                Ok(BlockPos::unpack(v as i64))
            }
        }

        deserializer.deserialize_newtype_struct("BlockPos", PackedVisitor)
    }
}
