//! Serde representation of the tree model.
//!
//! A [`Node`] serializes as an enum named [`NODE_TOKEN`] whose variants are the
//! node kinds. The tree codec recognizes the token and stores the node as is;
//! every other format sees an ordinary externally tagged enum. Int and long
//! arrays travel as newtype structs named by their own tokens so the tree codec
//! can rebuild the packed array kinds instead of plain lists.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{Compound, Node, NodeKind, NodeList};

pub(crate) const NODE_TOKEN: &str = "$drawer::private::Node";
pub(crate) const INT_ARRAY_TOKEN: &str = "$drawer::private::IntArray";
pub(crate) const LONG_ARRAY_TOKEN: &str = "$drawer::private::LongArray";

const VARIANTS: &[&str] = &[
    "End",
    "Byte",
    "Short",
    "Int",
    "Long",
    "Float",
    "Double",
    "ByteArray",
    "String",
    "List",
    "Compound",
    "IntArray",
    "LongArray",
];

// =============================================================================
// SERIALIZE
// =============================================================================

struct ByteArrayRef<'a>(&'a [i8]);

impl Serialize for ByteArrayRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes: Vec<u8> = self.0.iter().map(|&b| b as u8).collect();
        serializer.serialize_bytes(&bytes)
    }
}

struct PackedRef<'a, T> {
    token: &'static str,
    items: &'a [T],
}

impl<T: Serialize> Serialize for PackedRef<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(self.token, self.items)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        let (index, name) = (kind.id() as u32, kind.name());
        match self {
            Node::End => serializer.serialize_unit_variant(NODE_TOKEN, index, name),
            Node::Byte(v) => serializer.serialize_newtype_variant(NODE_TOKEN, index, name, v),
            Node::Short(v) => serializer.serialize_newtype_variant(NODE_TOKEN, index, name, v),
            Node::Int(v) => serializer.serialize_newtype_variant(NODE_TOKEN, index, name, v),
            Node::Long(v) => serializer.serialize_newtype_variant(NODE_TOKEN, index, name, v),
            Node::Float(v) => serializer.serialize_newtype_variant(NODE_TOKEN, index, name, v),
            Node::Double(v) => serializer.serialize_newtype_variant(NODE_TOKEN, index, name, v),
            Node::String(v) => serializer.serialize_newtype_variant(NODE_TOKEN, index, name, v),
            Node::List(v) => serializer.serialize_newtype_variant(NODE_TOKEN, index, name, v),
            Node::Compound(v) => serializer.serialize_newtype_variant(NODE_TOKEN, index, name, v),
            Node::ByteArray(v) => {
                serializer.serialize_newtype_variant(NODE_TOKEN, index, name, &ByteArrayRef(v))
            }
            Node::IntArray(v) => serializer.serialize_newtype_variant(
                NODE_TOKEN,
                index,
                name,
                &PackedRef { token: INT_ARRAY_TOKEN, items: v },
            ),
            Node::LongArray(v) => serializer.serialize_newtype_variant(
                NODE_TOKEN,
                index,
                name,
                &PackedRef { token: LONG_ARRAY_TOKEN, items: v },
            ),
        }
    }
}

impl Serialize for NodeList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for node in self {
            seq.serialize_element(node)?;
        }
        seq.end()
    }
}

impl Serialize for Compound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, node) in self.iter() {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

// =============================================================================
// DESERIALIZE
// =============================================================================

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KindVisitor;

        impl Visitor<'_> for KindVisitor {
            type Value = NodeKind;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a node kind name or tag id")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeKind, E> {
                u8::try_from(v)
                    .ok()
                    .and_then(NodeKind::from_id)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeKind, E> {
                NodeKind::ALL
                    .into_iter()
                    .find(|kind| kind.name() == v)
                    .ok_or_else(|| E::unknown_variant(v, VARIANTS))
            }
        }

        deserializer.deserialize_identifier(KindVisitor)
    }
}

struct ByteArrayBuf(Vec<i8>);

impl<'de> Deserialize<'de> for ByteArrayBuf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BytesVisitor;

        impl<'de> Visitor<'de> for BytesVisitor {
            type Value = ByteArrayBuf;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a byte array")
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<ByteArrayBuf, E> {
                Ok(ByteArrayBuf(v.iter().map(|&b| b as i8).collect()))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ByteArrayBuf, A::Error> {
                let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
                while let Some(b) = seq.next_element::<u8>()? {
                    bytes.push(b as i8);
                }
                Ok(ByteArrayBuf(bytes))
            }
        }

        deserializer.deserialize_byte_buf(BytesVisitor)
    }
}

trait Packed: Sized {
    const TOKEN: &'static str;
}

impl Packed for i32 {
    const TOKEN: &'static str = INT_ARRAY_TOKEN;
}

impl Packed for i64 {
    const TOKEN: &'static str = LONG_ARRAY_TOKEN;
}

struct PackedBuf<T>(Vec<T>);

impl<'de, T: Packed + Deserialize<'de>> Deserialize<'de> for PackedBuf<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PackedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for PackedVisitor<T> {
            type Value = PackedBuf<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a packed numeric array")
            }

            fn visit_newtype_struct<D: Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> Result<PackedBuf<T>, D::Error> {
                Vec::<T>::deserialize(deserializer).map(PackedBuf)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PackedBuf<T>, A::Error> {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(PackedBuf(items))
            }
        }

        deserializer.deserialize_newtype_struct(T::TOKEN, PackedVisitor(PhantomData))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a tree node")
            }

            fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Node, A::Error> {
                let (kind, variant) = data.variant::<NodeKind>()?;
                match kind {
                    NodeKind::End => variant.unit_variant().map(|()| Node::End),
                    NodeKind::Byte => variant.newtype_variant().map(Node::Byte),
                    NodeKind::Short => variant.newtype_variant().map(Node::Short),
                    NodeKind::Int => variant.newtype_variant().map(Node::Int),
                    NodeKind::Long => variant.newtype_variant().map(Node::Long),
                    NodeKind::Float => variant.newtype_variant().map(Node::Float),
                    NodeKind::Double => variant.newtype_variant().map(Node::Double),
                    NodeKind::String => variant.newtype_variant().map(Node::String),
                    NodeKind::List => variant.newtype_variant().map(Node::List),
                    NodeKind::Compound => variant.newtype_variant().map(Node::Compound),
                    NodeKind::ByteArray => variant
                        .newtype_variant::<ByteArrayBuf>()
                        .map(|b| Node::ByteArray(b.0)),
                    NodeKind::IntArray => variant
                        .newtype_variant::<PackedBuf<i32>>()
                        .map(|b| Node::IntArray(b.0)),
                    NodeKind::LongArray => variant
                        .newtype_variant::<PackedBuf<i64>>()
                        .map(|b| Node::LongArray(b.0)),
                }
            }
        }

        deserializer.deserialize_enum(NODE_TOKEN, VARIANTS, NodeVisitor)
    }
}

impl<'de> Deserialize<'de> for NodeList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Node>::deserialize(deserializer).map(NodeList::from)
    }
}

impl<'de> Deserialize<'de> for Compound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CompoundVisitor;

        impl<'de> Visitor<'de> for CompoundVisitor {
            type Value = Compound;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a compound")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Compound, A::Error> {
                let mut compound = Compound::with_capacity(map.size_hint().unwrap_or(0).min(4096));
                while let Some((key, node)) = map.next_entry::<String, Node>()? {
                    compound.insert(key, node);
                }
                Ok(compound)
            }
        }

        deserializer.deserialize_map(CompoundVisitor)
    }
}
