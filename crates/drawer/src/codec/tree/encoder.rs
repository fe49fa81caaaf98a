//! Tree encoder: a serde `Serializer` producing [`Node`]s.

use serde::ser::{self, Serialize};

use super::{Context, NbtConfig, SIZE_KEY, VALUE_KEY};
use crate::error::EncodeError;
use crate::model::{Compound, INT_ARRAY_TOKEN, LONG_ARRAY_TOKEN, NODE_TOKEN, Node, NodeKind, NodeList};
use crate::schema::SerializersModule;
use crate::tagged::{MapMode, PrimitiveSlot, StructureKind, TagStack, compose};

/// Pending polymorphic discriminator for the value being encoded.
#[derive(Debug, Clone, Copy)]
struct Envelope<'a> {
    key: &'a str,
    name: &'a str,
}

impl Envelope<'_> {
    fn wrap(self, payload: Node) -> Node {
        Node::Compound(
            Compound::with_capacity(2)
                .with(self.key, self.name)
                .with(VALUE_KEY, payload),
        )
    }

    fn open(self) -> Compound {
        Compound::new().with(self.key, self.name)
    }
}

fn seal(envelope: Option<Envelope<'_>>, node: Node) -> Node {
    match envelope {
        Some(envelope) => envelope.wrap(node),
        None => node,
    }
}

/// Encodes one value into a [`Node`].
///
/// Each nested structure gets a [`CompositeEncoder`] that accumulates its
/// elements and hands the finished node back from `end`.
pub struct TreeEncoder<'a> {
    cx: Context<'a>,
    tags: &'a mut TagStack,
    envelope: Option<Envelope<'a>>,
    saw_option: Option<&'a mut bool>,
}

impl<'a> TreeEncoder<'a> {
    pub fn new(module: &'a SerializersModule, config: NbtConfig, tags: &'a mut TagStack) -> Self {
        Self::with_context(Context { module, config }, tags)
    }

    pub(crate) fn with_context(cx: Context<'a>, tags: &'a mut TagStack) -> Self {
        Self {
            cx,
            tags,
            envelope: None,
            saw_option: None,
        }
    }

    fn emit(self, node: Node) -> Result<Node, EncodeError> {
        Ok(seal(self.envelope, node))
    }

    fn mark_option(&mut self) {
        if let Some(flag) = self.saw_option.as_deref_mut() {
            *flag = true;
        }
    }

    fn variant_envelope(&self, name: &'static str, variant: &'static str) -> Envelope<'a> {
        Envelope {
            key: self.cx.module.class_discriminator(),
            name: self.cx.module.serial_name_of(name, variant),
        }
    }

    fn composite(
        self,
        kind: StructureKind,
        state: Composite,
        variant: Option<Envelope<'a>>,
        discriminator: Option<&'a str>,
    ) -> CompositeEncoder<'a> {
        CompositeEncoder {
            cx: self.cx,
            tags: self.tags,
            kind,
            state,
            index: 0,
            variant,
            outer: self.envelope,
            discriminator,
        }
    }

    /// Encodes a packed int or long array from its element sequence.
    fn packed<T: ?Sized + Serialize>(self, token: &str, value: &T) -> Result<Node, EncodeError> {
        let list = match value.serialize(TreeEncoder::with_context(self.cx, &mut *self.tags))? {
            Node::List(list) => list,
            other => return self.emit(other),
        };
        let packed = if token == INT_ARRAY_TOKEN {
            Node::IntArray(collect_packed(&list, |n| match *n {
                Node::Int(v) => Some(v),
                _ => None,
            })?)
        } else {
            Node::LongArray(collect_packed(&list, |n| match *n {
                Node::Long(v) => Some(v),
                _ => None,
            })?)
        };
        self.emit(packed)
    }
}

fn collect_packed<T>(list: &NodeList, item: impl Fn(&Node) -> Option<T>) -> Result<Vec<T>, EncodeError> {
    list.iter()
        .map(|n| {
            item(n).ok_or_else(|| {
                EncodeError::Message(format!("packed array holds a {} node", n.kind()))
            })
        })
        .collect()
}

impl<'a> ser::Serializer for TreeEncoder<'a> {
    type Ok = Node;
    type Error = EncodeError;

    type SerializeSeq = CompositeEncoder<'a>;
    type SerializeTuple = CompositeEncoder<'a>;
    type SerializeTupleStruct = CompositeEncoder<'a>;
    type SerializeTupleVariant = CompositeEncoder<'a>;
    type SerializeMap = CompositeEncoder<'a>;
    type SerializeStruct = CompositeEncoder<'a>;
    type SerializeStructVariant = CompositeEncoder<'a>;

    fn serialize_bool(self, v: bool) -> Result<Node, EncodeError> {
        self.emit(Node::Byte(v as i8))
    }

    fn serialize_i8(self, v: i8) -> Result<Node, EncodeError> {
        self.emit(Node::Byte(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Node, EncodeError> {
        self.emit(Node::Short(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Node, EncodeError> {
        self.emit(Node::Int(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Node, EncodeError> {
        self.emit(Node::Long(v))
    }

    // Unsigned values keep their bit pattern in the signed kind of equal width.
    fn serialize_u8(self, v: u8) -> Result<Node, EncodeError> {
        self.emit(Node::Byte(v as i8))
    }

    fn serialize_u16(self, v: u16) -> Result<Node, EncodeError> {
        self.emit(Node::Short(v as i16))
    }

    fn serialize_u32(self, v: u32) -> Result<Node, EncodeError> {
        self.emit(Node::Int(v as i32))
    }

    fn serialize_u64(self, v: u64) -> Result<Node, EncodeError> {
        self.emit(Node::Long(v as i64))
    }

    fn serialize_f32(self, v: f32) -> Result<Node, EncodeError> {
        self.emit(Node::Float(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node, EncodeError> {
        self.emit(Node::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Node, EncodeError> {
        self.emit(Node::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node, EncodeError> {
        self.emit(Node::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node, EncodeError> {
        self.emit(Node::ByteArray(v.iter().map(|&b| b as i8).collect()))
    }

    fn serialize_none(mut self) -> Result<Node, EncodeError> {
        self.mark_option();
        self.emit(Node::End)
    }

    fn serialize_some<T: ?Sized + Serialize>(mut self, value: &T) -> Result<Node, EncodeError> {
        self.mark_option();
        // An optional payload always sits under the value key, never merged:
        // a merged struct field named like it would read back as a null payload.
        let TreeEncoder {
            cx, tags, envelope, ..
        } = self;
        let node = value.serialize(TreeEncoder {
            cx,
            tags,
            envelope: None,
            saw_option: None,
        })?;
        Ok(seal(envelope, node))
    }

    fn serialize_unit(self) -> Result<Node, EncodeError> {
        self.emit(Node::Compound(Compound::new()))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node, EncodeError> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Node, EncodeError> {
        if name == NODE_TOKEN {
            return self.emit(Node::End);
        }
        let serial_name = self.cx.module.serial_name_of(name, variant);
        self.emit(Node::String(serial_name.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Node, EncodeError> {
        if name == INT_ARRAY_TOKEN || name == LONG_ARRAY_TOKEN {
            return self.packed(name, value);
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node, EncodeError> {
        if name == NODE_TOKEN {
            return value.serialize(self);
        }
        let inner = self.variant_envelope(name, variant);
        let TreeEncoder {
            cx, tags, envelope, ..
        } = self;
        let node = value.serialize(TreeEncoder {
            cx,
            tags,
            envelope: Some(inner),
            saw_option: None,
        })?;
        Ok(seal(envelope, node))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<CompositeEncoder<'a>, EncodeError> {
        let state = Composite::items(len);
        Ok(self.composite(StructureKind::List, state, None, None))
    }

    fn serialize_tuple(self, len: usize) -> Result<CompositeEncoder<'a>, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<CompositeEncoder<'a>, EncodeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<CompositeEncoder<'a>, EncodeError> {
        let inner = self.variant_envelope(name, variant);
        let state = Composite::items(Some(len));
        Ok(self.composite(StructureKind::List, state, Some(inner), None))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<CompositeEncoder<'a>, EncodeError> {
        let state = Composite::Entries(MapState::default());
        Ok(self.composite(StructureKind::Map(MapMode::Compound), state, None, None))
    }

    fn serialize_struct(
        mut self,
        _name: &'static str,
        len: usize,
    ) -> Result<CompositeEncoder<'a>, EncodeError> {
        match self.envelope.take() {
            // A struct payload absorbs the discriminator of its enclosing variant.
            Some(envelope) => Ok(self.composite(
                StructureKind::Polymorphic,
                Composite::Fields(envelope.open()),
                None,
                Some(envelope.key),
            )),
            None => Ok(self.composite(
                StructureKind::Class,
                Composite::Fields(Compound::with_capacity(len)),
                None,
                None,
            )),
        }
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<CompositeEncoder<'a>, EncodeError> {
        let inner = self.variant_envelope(name, variant);
        Ok(self.composite(
            StructureKind::Polymorphic,
            Composite::Fields(inner.open()),
            None,
            Some(inner.key),
        ))
    }
}

// =============================================================================
// NESTED STRUCTURES
// =============================================================================

enum PendingKey {
    Named(String),
    Paired,
}

#[derive(Default)]
struct MapState {
    mode: Option<MapMode>,
    compound: Compound,
    pairs: NodeList,
    key: PrimitiveSlot<PendingKey>,
}

enum Composite {
    Fields(Compound),
    Items { items: NodeList, nullable: bool },
    Entries(MapState),
}

impl Composite {
    fn items(len: Option<usize>) -> Self {
        Composite::Items {
            items: NodeList::with_capacity(len.unwrap_or(0)),
            nullable: false,
        }
    }
}

/// Accumulates the elements of one nested structure.
pub struct CompositeEncoder<'a> {
    cx: Context<'a>,
    tags: &'a mut TagStack,
    kind: StructureKind,
    state: Composite,
    index: usize,
    /// Wraps the finished node for tuple variants.
    variant: Option<Envelope<'a>>,
    /// Envelope of an enclosing newtype variant.
    outer: Option<Envelope<'a>>,
    /// Reserved key already written into a polymorphic struct.
    discriminator: Option<&'a str>,
}

impl CompositeEncoder<'_> {
    /// Encodes one element under its tag, reporting whether it was an `Option`.
    fn encode_element<T: ?Sized + Serialize>(
        &mut self,
        declared: &str,
        value: &T,
    ) -> Result<(Node, bool), EncodeError> {
        let index = self.index;
        self.index += 1;
        let tag = self.kind.element_tag(declared, index);
        self.tags.push_child(&tag);
        let mut saw_option = false;
        let node = value.serialize(TreeEncoder {
            cx: self.cx,
            tags: &mut *self.tags,
            envelope: None,
            saw_option: Some(&mut saw_option),
        })?;
        self.tags.pop()?;
        Ok((node, saw_option))
    }

    fn misuse(&self, call: &str) -> EncodeError {
        EncodeError::Message(format!("{call} is not valid inside a {:?} structure", self.kind))
    }

    fn push_item<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        let index = self.index;
        let (node, saw_option) = self.encode_element("", value)?;
        match &mut self.state {
            Composite::Items { items, nullable } => {
                *nullable |= saw_option;
                items.put_at(index, node);
                Ok(())
            }
            _ => Err(self.misuse("sequence element")),
        }
    }

    fn push_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<(), EncodeError> {
        if self.discriminator == Some(key) {
            return Err(EncodeError::DiscriminatorConflict {
                key: key.to_owned(),
                path: self.tags.current_path().to_owned(),
            });
        }
        let (node, _) = self.encode_element(key, value)?;
        match &mut self.state {
            Composite::Fields(fields) => {
                fields.insert(key, node);
                Ok(())
            }
            _ => Err(self.misuse("struct field")),
        }
    }

    fn finish(self) -> Result<Node, EncodeError> {
        let node = match self.state {
            Composite::Fields(fields) => Node::Compound(fields),
            Composite::Items { items, nullable } if nullable => {
                nullable_compound(items, self.cx.config.explicit_list_size)
            }
            Composite::Items { items, .. } => Node::List(items),
            Composite::Entries(map) => match map.mode {
                Some(MapMode::PairList) => Node::List(map.pairs),
                _ => Node::Compound(map.compound),
            },
        };
        Ok(seal(self.outer, seal(self.variant, node)))
    }
}

/// Stores a list with null slots as a compound of its present slots.
fn nullable_compound(items: NodeList, explicit_size: bool) -> Node {
    let len = items.len();
    let mut compound = Compound::with_capacity(len + 1);
    if explicit_size {
        compound.insert(SIZE_KEY, Node::Int(len as i32));
    }
    for (index, node) in items.into_vec().into_iter().enumerate() {
        if !node.is_null() {
            compound.insert(index.to_string(), node);
        }
    }
    Node::Compound(compound)
}

impl ser::SerializeSeq for CompositeEncoder<'_> {
    type Ok = Node;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.push_item(value)
    }

    fn end(self) -> Result<Node, EncodeError> {
        self.finish()
    }
}

impl ser::SerializeTuple for CompositeEncoder<'_> {
    type Ok = Node;
    type Error = EncodeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.push_item(value)
    }

    fn end(self) -> Result<Node, EncodeError> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for CompositeEncoder<'_> {
    type Ok = Node;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.push_item(value)
    }

    fn end(self) -> Result<Node, EncodeError> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for CompositeEncoder<'_> {
    type Ok = Node;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        self.push_item(value)
    }

    fn end(self) -> Result<Node, EncodeError> {
        self.finish()
    }
}

impl ser::SerializeMap for CompositeEncoder<'_> {
    type Ok = Node;
    type Error = EncodeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), EncodeError> {
        let index = self.index;
        let (node, _) = self.encode_element("", key)?;
        let invalid = |kind: NodeKind, tags: &TagStack| EncodeError::InvalidKeyKind {
            kind,
            path: compose(tags.current_path(), &index.to_string()),
        };
        let Composite::Entries(map) = &mut self.state else {
            return Err(self.misuse("map key"));
        };
        let mode = match map.mode {
            Some(mode) => mode,
            None => {
                let mode = MapMode::for_key(node.kind()).ok_or_else(|| invalid(node.kind(), self.tags))?;
                map.mode = Some(mode);
                mode
            }
        };
        let pending = match mode {
            MapMode::Compound => PendingKey::Named(
                node.to_key_string()
                    .ok_or_else(|| invalid(node.kind(), self.tags))?,
            ),
            MapMode::PairList => {
                map.pairs.push(node);
                PendingKey::Paired
            }
        };
        map.key.record(pending)?;
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodeError> {
        let (node, _) = self.encode_element("", value)?;
        let Composite::Entries(map) = &mut self.state else {
            return Err(self.misuse("map value"));
        };
        match std::mem::take(&mut map.key).finish()? {
            PendingKey::Named(key) => {
                map.compound.insert(key, node);
            }
            PendingKey::Paired => map.pairs.push(node),
        }
        Ok(())
    }

    fn end(self) -> Result<Node, EncodeError> {
        self.finish()
    }
}

impl ser::SerializeStruct for CompositeEncoder<'_> {
    type Ok = Node;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.push_field(key, value)
    }

    fn end(self) -> Result<Node, EncodeError> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for CompositeEncoder<'_> {
    type Ok = Node;
    type Error = EncodeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.push_field(key, value)
    }

    fn end(self) -> Result<Node, EncodeError> {
        self.finish()
    }
}
