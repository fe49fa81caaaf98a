//! Tree decoder: a serde `Deserializer` reading borrowed [`Node`]s.

use serde::de::value::{BorrowedStrDeserializer, SeqDeserializer, StrDeserializer};
use serde::de::{self, DeserializeSeed, IntoDeserializer, Visitor};

use super::map_key::MapKeyDecoder;
use super::{Context, NbtConfig, SIZE_KEY, VALUE_KEY};
use crate::error::DecodeError;
use crate::limits::MAX_COLLECTION_LEN;
use crate::model::{Compound, NODE_TOKEN, NULL, Node, NodeKind};
use crate::schema::{ElementKind, SerializersModule};
use crate::tagged::{ElementCursor, MapMode, StructureKind, TagStack};

/// Decodes one value from a [`Node`].
///
/// The physical kind of each node picks the sub-decoder: a sequence request
/// over a compound reads a nullable list, a map request over a list reads key
/// and value pairs. Missing struct fields are skipped, leaving them to serde
/// defaults.
pub struct TreeDecoder<'de, 'a> {
    cx: Context<'a>,
    tags: &'a mut TagStack,
    node: &'de Node,
    /// `node` is a polymorphic compound whose non-struct payload sits under `"value"`.
    envelope: bool,
    /// A String node may stand in for a structure as inline JSON.
    inline_text: bool,
}

impl<'de, 'a> TreeDecoder<'de, 'a> {
    pub fn new(
        module: &'a SerializersModule,
        config: NbtConfig,
        tags: &'a mut TagStack,
        node: &'de Node,
    ) -> Self {
        Self::with_context(Context { module, config }, tags, node)
    }

    pub(crate) fn with_context(cx: Context<'a>, tags: &'a mut TagStack, node: &'de Node) -> Self {
        Self {
            cx,
            tags,
            node,
            envelope: false,
            inline_text: false,
        }
    }

    fn envelope_value(&self) -> Option<&'de Node> {
        match self.node {
            Node::Compound(c) => c.get(VALUE_KEY),
            _ => None,
        }
    }

    /// The node holding this value's data, looking through an envelope.
    fn value_node(&self) -> &'de Node {
        if self.envelope {
            self.envelope_value().unwrap_or(&NULL)
        } else {
            self.node
        }
    }

    /// Reads an integral value; floats are accepted only when they hold a whole number.
    fn integer(&self, expected: &'static str) -> Result<i128, DecodeError> {
        let whole = |v: f64, kind: NodeKind| {
            if v.is_finite() && v.fract() == 0.0 {
                Ok(v as i128)
            } else {
                Err(DecodeError::mismatch(expected, format_args!("{kind} {v}")))
            }
        };
        match self.value_node() {
            Node::Float(v) => whole(f64::from(*v), NodeKind::Float),
            Node::Double(v) => whole(*v, NodeKind::Double),
            Node::String(s) => s
                .trim()
                .parse()
                .map_err(|_| DecodeError::mismatch(expected, format_args!("String {s:?}"))),
            node => node
                .as_i64()
                .map(i128::from)
                .ok_or_else(|| DecodeError::mismatch(expected, node.kind())),
        }
    }

    fn out_of_range(&self, expected: &'static str, value: i128) -> DecodeError {
        DecodeError::mismatch(expected, format_args!("{} {value}", self.value_node().kind()))
    }

    fn float(&self, expected: &'static str) -> Result<f64, DecodeError> {
        match self.value_node() {
            Node::String(s) => s
                .trim()
                .parse()
                .map_err(|_| DecodeError::mismatch(expected, format_args!("String {s:?}"))),
            node => node
                .as_f64()
                .ok_or_else(|| DecodeError::mismatch(expected, node.kind())),
        }
    }

    /// Decodes a structure from inline JSON text.
    fn inline<V>(
        text: &'de str,
        decode: impl FnOnce(
            &mut serde_json::Deserializer<serde_json::de::StrRead<'de>>,
        ) -> Result<V, serde_json::Error>,
    ) -> Result<V, DecodeError> {
        let inline_error = |e: serde_json::Error| DecodeError::InlineText {
            message: e.to_string(),
        };
        let mut json = serde_json::Deserializer::from_str(text);
        let value = decode(&mut json).map_err(inline_error)?;
        json.end().map_err(inline_error)?;
        Ok(value)
    }
}

/// Decodes `node` as the element `tag` of the current element.
fn decode_child<'de, T: DeserializeSeed<'de>>(
    cx: Context<'_>,
    tags: &mut TagStack,
    tag: &str,
    node: &'de Node,
    inline_text: bool,
    seed: T,
) -> Result<T::Value, DecodeError> {
    tags.push_child(tag);
    let result = seed.deserialize(TreeDecoder {
        cx,
        tags: &mut *tags,
        node,
        envelope: false,
        inline_text,
    });
    match result {
        Ok(value) => {
            tags.pop()?;
            Ok(value)
        }
        Err(e) => {
            let e = e.at(tags.current_path());
            tags.pop()?;
            Err(e)
        }
    }
}

macro_rules! decode_integer {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
                let value = self.integer(stringify!($ty))?;
                let value = <$ty>::try_from(value)
                    .map_err(|_| self.out_of_range(stringify!($ty), value))?;
                visitor.$visit(value)
            }
        )*
    };
}

// Unsigned values were stored with the bit pattern of the signed kind of
// equal width, so negative values of that kind are unwrapped.
macro_rules! decode_unsigned {
    ($($method:ident => $visit:ident: $ty:ty as $signed:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
                let value = self.integer(stringify!($ty))?;
                let value = <$ty>::try_from(value)
                    .or_else(|_| <$signed>::try_from(value).map(|v| v as $ty))
                    .map_err(|_| self.out_of_range(stringify!($ty), value))?;
                visitor.$visit(value)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for TreeDecoder<'de, '_> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.value_node() {
            Node::End => visitor.visit_none(),
            Node::Byte(v) => visitor.visit_i8(*v),
            Node::Short(v) => visitor.visit_i16(*v),
            Node::Int(v) => visitor.visit_i32(*v),
            Node::Long(v) => visitor.visit_i64(*v),
            Node::Float(v) => visitor.visit_f32(*v),
            Node::Double(v) => visitor.visit_f64(*v),
            Node::String(s) => visitor.visit_borrowed_str(s),
            Node::ByteArray(_) | Node::IntArray(_) | Node::LongArray(_) | Node::List(_) => {
                self.deserialize_seq(visitor)
            }
            Node::Compound(_) => self.deserialize_map(visitor),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_bool(self.integer("bool")? != 0)
    }

    decode_integer! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
    }

    decode_unsigned! {
        deserialize_u8 => visit_u8: u8 as i8,
        deserialize_u16 => visit_u16: u16 as i16,
        deserialize_u32 => visit_u32: u32 as i32,
        deserialize_u64 => visit_u64: u64 as i64,
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_f32(self.float("f32")? as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_f64(self.float("f64")?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.value_node() {
            Node::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => visitor.visit_char(c),
                    _ => Err(DecodeError::mismatch("char", format_args!("String {s:?}"))),
                }
            }
            node => Err(DecodeError::mismatch("char", node.kind())),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.value_node() {
            Node::String(s) => visitor.visit_borrowed_str(s),
            node => Err(DecodeError::mismatch("String", node.kind())),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.value_node() {
            Node::ByteArray(v) => visitor.visit_byte_buf(v.iter().map(|&b| b as u8).collect()),
            Node::List(_) => self.deserialize_seq(visitor),
            node => Err(DecodeError::mismatch("ByteArray", node.kind())),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        if self.envelope {
            // Optional payloads are never merged into the envelope.
            return match self.envelope_value() {
                None | Some(Node::End) => visitor.visit_none(),
                Some(payload) => visitor.visit_some(TreeDecoder {
                    node: payload,
                    envelope: false,
                    ..self
                }),
            };
        }
        if self.node.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.value_node() {
            Node::Compound(_) | Node::End => visitor.visit_unit(),
            node => Err(DecodeError::mismatch("unit", node.kind())),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let node = self.value_node();
        match (StructureKind::select(ElementKind::List, node.kind()), node) {
            (Some(StructureKind::List), Node::List(list)) => visitor.visit_seq(ListAccess {
                cx: self.cx,
                tags: self.tags,
                items: list.iter(),
                index: 0,
            }),
            (Some(StructureKind::List), Node::ByteArray(v)) => {
                visitor.visit_seq(SeqDeserializer::new(v.iter().copied()))
            }
            (Some(StructureKind::List), Node::IntArray(v)) => {
                visitor.visit_seq(SeqDeserializer::new(v.iter().copied()))
            }
            (Some(StructureKind::List), Node::LongArray(v)) => {
                visitor.visit_seq(SeqDeserializer::new(v.iter().copied()))
            }
            (Some(StructureKind::NullableList), Node::Compound(compound)) => {
                let access = NullableListAccess::new(self.cx, self.tags, compound)?;
                visitor.visit_seq(access)
            }
            (_, Node::String(s)) if self.inline_text => {
                Self::inline(s, |json| de::Deserializer::deserialize_seq(json, visitor))
            }
            (_, node) => Err(DecodeError::mismatch("List", node.kind())),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let node = self.value_node();
        match (StructureKind::select(ElementKind::Map, node.kind()), node) {
            (Some(StructureKind::Map(MapMode::Compound)), Node::Compound(compound)) => {
                visitor.visit_map(CompoundMapAccess {
                    cx: self.cx,
                    tags: self.tags,
                    entries: compound.entries(),
                    pending: None,
                    index: 0,
                })
            }
            (Some(StructureKind::Map(MapMode::PairList)), Node::List(list)) => {
                visitor.visit_map(PairListAccess {
                    cx: self.cx,
                    tags: self.tags,
                    items: list.iter(),
                    index: 0,
                })
            }
            (_, Node::String(s)) if self.inline_text => {
                Self::inline(s, |json| de::Deserializer::deserialize_map(json, visitor))
            }
            (_, node) => Err(DecodeError::mismatch("Map", node.kind())),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        // Struct payloads are merged into their envelope, so read the whole node.
        let node = self.node;
        match (StructureKind::select(ElementKind::Class, node.kind()), node) {
            (Some(StructureKind::Class), Node::Compound(compound)) => {
                visitor.visit_map(ClassAccess::new(self.cx, self.tags, compound, fields))
            }
            (Some(StructureKind::List), Node::List(list)) => visitor.visit_seq(ListAccess {
                cx: self.cx,
                tags: self.tags,
                items: list.iter(),
                index: 0,
            }),
            (_, Node::String(s)) if self.inline_text => Self::inline(s, |json| {
                de::Deserializer::deserialize_struct(json, name, fields, visitor)
            }),
            (_, node) => Err(DecodeError::mismatch(name, node.kind())),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        if name == NODE_TOKEN {
            return visitor.visit_enum(NodeAccess { decoder: self });
        }
        let node = self.value_node();
        match (StructureKind::select(ElementKind::Enum, node.kind()), node) {
            (Some(StructureKind::Primitive), Node::String(serial_name)) => {
                let variant = resolve_variant(self.cx.module, name, serial_name, variants)?;
                visitor.visit_enum(variant.into_deserializer())
            }
            (Some(StructureKind::Primitive), node) if node.as_i64().is_some() => {
                let ordinal = node.as_i64().unwrap_or(-1);
                let variant = usize::try_from(ordinal)
                    .ok()
                    .and_then(|i| variants.get(i).copied())
                    .ok_or_else(|| {
                        <DecodeError as de::Error>::unknown_variant(&ordinal.to_string(), variants)
                    })?;
                let variant: StrDeserializer<'static, DecodeError> = variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            (Some(StructureKind::Polymorphic), Node::Compound(compound)) => {
                let key = self.cx.module.class_discriminator();
                let serial_name = match compound.get(key) {
                    Some(Node::String(s)) => s,
                    _ => {
                        return Err(DecodeError::MissingDiscriminator {
                            path: String::new(),
                            key: key.to_owned(),
                        });
                    }
                };
                let variant = resolve_variant(self.cx.module, name, serial_name, variants)?;
                visitor.visit_enum(PolymorphicAccess {
                    cx: self.cx,
                    tags: self.tags,
                    node,
                    compound,
                    variant,
                })
            }
            (_, node) => Err(DecodeError::mismatch(name, node.kind())),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_unit()
    }
}

/// Maps a stored serial name to the declared variant it was registered for.
fn resolve_variant(
    module: &SerializersModule,
    name: &str,
    serial_name: &str,
    variants: &'static [&'static str],
) -> Result<&'static str, DecodeError> {
    let declared = module.variant_of(name, serial_name);
    variants
        .iter()
        .copied()
        .find(|v| *v == declared)
        .ok_or_else(|| de::Error::unknown_variant(serial_name, variants))
}

// =============================================================================
// STRUCTURE ACCESS
// =============================================================================

/// Named fields, visited in declaration order, absent ones skipped.
struct ClassAccess<'de, 'a> {
    cx: Context<'a>,
    tags: &'a mut TagStack,
    compound: &'de Compound,
    cursor: ElementCursor<'static>,
    pending: Option<&'static str>,
}

impl<'de, 'a> ClassAccess<'de, 'a> {
    fn new(
        cx: Context<'a>,
        tags: &'a mut TagStack,
        compound: &'de Compound,
        fields: &'static [&'static str],
    ) -> Self {
        Self {
            cx,
            tags,
            compound,
            cursor: ElementCursor::new(fields),
            pending: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for ClassAccess<'de, '_> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>, DecodeError> {
        let compound = self.compound;
        match self.cursor.next_present(|name| compound.contains_key(name)) {
            Some(index) => {
                let name = self.cursor.name(index);
                self.pending = Some(name);
                seed.deserialize(BorrowedStrDeserializer::<DecodeError>::new(name))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, DecodeError> {
        let name = self
            .pending
            .take()
            .ok_or_else(|| DecodeError::Message("struct value requested before its key".into()))?;
        let node = self.compound.get(name).unwrap_or(&NULL);
        decode_child(self.cx, self.tags, name, node, false, seed)
    }
}

struct ListAccess<'de, 'a> {
    cx: Context<'a>,
    tags: &'a mut TagStack,
    items: std::slice::Iter<'de, Node>,
    index: usize,
}

impl<'de> de::SeqAccess<'de> for ListAccess<'de, '_> {
    type Error = DecodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>, DecodeError> {
        let Some(node) = self.items.next() else {
            return Ok(None);
        };
        let index = self.index;
        self.index += 1;
        decode_child(self.cx, self.tags, &index.to_string(), node, false, seed).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// A list stored as a compound of its non-null slots.
struct NullableListAccess<'de, 'a> {
    cx: Context<'a>,
    tags: &'a mut TagStack,
    compound: &'de Compound,
    len: usize,
    index: usize,
}

impl<'de, 'a> NullableListAccess<'de, 'a> {
    fn new(cx: Context<'a>, tags: &'a mut TagStack, compound: &'de Compound) -> Result<Self, DecodeError> {
        let len = match compound.get(SIZE_KEY) {
            Some(node) => node
                .as_i64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| DecodeError::mismatch("non-negative list size", node.kind()))?,
            None => {
                // Without a size entry the list ends at the last present slot.
                let len = compound
                    .keys()
                    .filter_map(|k| k.parse::<usize>().ok())
                    .max()
                    .map_or(0, |last| last + 1);
                tracing::debug!(len, "nullable list without size entry");
                len
            }
        };
        if len > MAX_COLLECTION_LEN {
            return Err(DecodeError::LengthExceedsLimit {
                field: "nullable list",
                len,
                max: MAX_COLLECTION_LEN,
            });
        }
        Ok(Self {
            cx,
            tags,
            compound,
            len,
            index: 0,
        })
    }
}

impl<'de> de::SeqAccess<'de> for NullableListAccess<'de, '_> {
    type Error = DecodeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>, DecodeError> {
        if self.index >= self.len {
            return Ok(None);
        }
        let tag = self.index.to_string();
        self.index += 1;
        let node = self.compound.get(&tag).unwrap_or(&NULL);
        decode_child(self.cx, self.tags, &tag, node, false, seed).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len - self.index)
    }
}

/// A map stored as a compound keyed by stringified keys.
struct CompoundMapAccess<'de, 'a> {
    cx: Context<'a>,
    tags: &'a mut TagStack,
    entries: std::collections::hash_map::Iter<'de, String, Node>,
    pending: Option<&'de Node>,
    index: usize,
}

impl<'de> de::MapAccess<'de> for CompoundMapAccess<'de, '_> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>, DecodeError> {
        let Some((key, node)) = self.entries.next() else {
            return Ok(None);
        };
        self.pending = Some(node);
        let index = self.index;
        self.index += 1;
        seed.deserialize(MapKeyDecoder::new(key, self.cx.module))
            .map(Some)
            .map_err(|e| e.at(&crate::tagged::compose(self.tags.current_path(), &index.to_string())))
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, DecodeError> {
        let node = self
            .pending
            .take()
            .ok_or_else(|| DecodeError::Message("map value requested before its key".into()))?;
        let index = self.index;
        self.index += 1;
        decode_child(self.cx, self.tags, &index.to_string(), node, true, seed)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// A map stored as a list alternating keys and values.
struct PairListAccess<'de, 'a> {
    cx: Context<'a>,
    tags: &'a mut TagStack,
    items: std::slice::Iter<'de, Node>,
    index: usize,
}

impl<'de> de::MapAccess<'de> for PairListAccess<'de, '_> {
    type Error = DecodeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>, DecodeError> {
        let Some(node) = self.items.next() else {
            return Ok(None);
        };
        let index = self.index;
        self.index += 1;
        decode_child(self.cx, self.tags, &index.to_string(), node, false, seed).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, DecodeError> {
        let index = self.index;
        let node = self.items.next().ok_or_else(|| DecodeError::InvalidLength {
            path: self.tags.current_path().to_owned(),
            len: index,
            expected: "an even number of key and value elements".into(),
        })?;
        self.index += 1;
        decode_child(self.cx, self.tags, &index.to_string(), node, true, seed)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len() / 2)
    }
}

// =============================================================================
// ENUM ACCESS
// =============================================================================

/// A data-carrying variant stored under the class discriminator.
struct PolymorphicAccess<'de, 'a> {
    cx: Context<'a>,
    tags: &'a mut TagStack,
    node: &'de Node,
    compound: &'de Compound,
    variant: &'static str,
}

impl<'de, 'a> de::EnumAccess<'de> for PolymorphicAccess<'de, 'a> {
    type Error = DecodeError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self), DecodeError> {
        let variant: StrDeserializer<'static, DecodeError> = self.variant.into_deserializer();
        let value = seed.deserialize(variant)?;
        Ok((value, self))
    }
}

impl<'de> de::VariantAccess<'de> for PolymorphicAccess<'de, '_> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<(), DecodeError> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, DecodeError> {
        seed.deserialize(TreeDecoder {
            cx: self.cx,
            tags: self.tags,
            node: self.node,
            envelope: true,
            inline_text: false,
        })
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, DecodeError> {
        let payload = self.compound.get(VALUE_KEY).unwrap_or(&NULL);
        de::Deserializer::deserialize_seq(TreeDecoder::with_context(self.cx, self.tags, payload), visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_map(ClassAccess::new(self.cx, self.tags, self.compound, fields))
    }
}

/// A [`Node`] read back as itself.
struct NodeAccess<'de, 'a> {
    decoder: TreeDecoder<'de, 'a>,
}

impl<'de, 'a> de::EnumAccess<'de> for NodeAccess<'de, 'a> {
    type Error = DecodeError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self), DecodeError> {
        let kind: StrDeserializer<'static, DecodeError> =
            self.decoder.value_node().kind().name().into_deserializer();
        let value = seed.deserialize(kind)?;
        Ok((value, self))
    }
}

impl<'de> de::VariantAccess<'de> for NodeAccess<'de, '_> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<(), DecodeError> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, DecodeError> {
        seed.deserialize(self.decoder)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value, DecodeError> {
        Err(DecodeError::mismatch("node", "tuple variant"))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, DecodeError> {
        Err(DecodeError::mismatch("node", "struct variant"))
    }
}
