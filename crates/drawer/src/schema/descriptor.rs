//! Reflection data for serde types.
//!
//! serde exposes no reflection API, but every `Deserialize` impl announces the
//! shape it expects with its first call into the deserializer. [`Descriptor::of`]
//! drives `T::deserialize` against a probe that records that first call and
//! stops, so no data is ever needed.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use thiserror::Error;

/// Structural kind of a type as its `Deserialize` impl requests it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Numbers, strings, chars, bools, bytes, unit.
    Primitive,
    /// Sum types. Unit-only enums and data-carrying ones alike.
    Enum,
    /// Sequences and tuples.
    List,
    Map,
    /// Structs with named fields.
    Class,
    /// Self-describing values whose shape is only known from the data.
    Any,
}

/// Schema information for one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    serial_name: &'static str,
    kind: ElementKind,
    nullable: bool,
    elements: &'static [&'static str],
}

impl Descriptor {
    /// Probes `T`'s `Deserialize` impl.
    pub fn of<'de, T: Deserialize<'de>>() -> Descriptor {
        let mut descriptor = Descriptor {
            serial_name: "",
            kind: ElementKind::Any,
            nullable: false,
            elements: &[],
        };
        // Every probe error is `ProbeDone`, raised once the shape is recorded or
        // by an impl failing early; either way what was recorded is kept.
        match T::deserialize(Probe {
            out: &mut descriptor,
        }) {
            Err(ProbeDone) => {}
            Ok(_) => tracing::trace!("descriptor probe completed without a shape request"),
        }
        if descriptor.serial_name.is_empty() {
            descriptor.serial_name = "any";
        }
        descriptor
    }

    /// The type's serial name: the struct/enum name, or the primitive type name.
    pub fn serial_name(&self) -> &'static str {
        self.serial_name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// True if the type is an `Option`.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Field name (classes) or variant name (enums) at position `index`.
    pub fn element_name(&self, index: usize) -> Option<&'static str> {
        self.elements.get(index).copied()
    }

    /// Position of a declared field or variant.
    pub fn element_index(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| *e == name)
    }

    pub fn element_names(&self) -> &'static [&'static str] {
        self.elements
    }

    /// Enum variant name for an ordinal.
    pub fn ordinal_to_name(&self, ordinal: usize) -> Option<&'static str> {
        match self.kind {
            ElementKind::Enum => self.element_name(ordinal),
            _ => None,
        }
    }

    /// Enum ordinal for a variant name.
    pub fn name_to_ordinal(&self, name: &str) -> Option<usize> {
        match self.kind {
            ElementKind::Enum => self.element_index(name),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("descriptor probe finished")]
struct ProbeDone;

impl de::Error for ProbeDone {
    fn custom<T: fmt::Display>(_msg: T) -> Self {
        ProbeDone
    }
}

struct Probe<'a> {
    out: &'a mut Descriptor,
}

impl Probe<'_> {
    fn record<V>(
        self,
        name: &'static str,
        kind: ElementKind,
        elements: &'static [&'static str],
    ) -> Result<V, ProbeDone> {
        if self.out.serial_name.is_empty() {
            self.out.serial_name = name;
        }
        self.out.kind = kind;
        self.out.elements = elements;
        Err(ProbeDone)
    }
}

macro_rules! probe_primitive {
    ($($method:ident => $name:literal),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, ProbeDone> {
                self.record($name, ElementKind::Primitive, &[])
            }
        )*
    };
}

impl<'de> Deserializer<'de> for Probe<'_> {
    type Error = ProbeDone;

    probe_primitive! {
        deserialize_bool => "bool",
        deserialize_i8 => "i8",
        deserialize_i16 => "i16",
        deserialize_i32 => "i32",
        deserialize_i64 => "i64",
        deserialize_u8 => "u8",
        deserialize_u16 => "u16",
        deserialize_u32 => "u32",
        deserialize_u64 => "u64",
        deserialize_f32 => "f32",
        deserialize_f64 => "f64",
        deserialize_char => "char",
        deserialize_str => "String",
        deserialize_string => "String",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_unit => "unit",
        deserialize_identifier => "identifier",
        deserialize_ignored_any => "any",
    }

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, ProbeDone> {
        self.record("any", ElementKind::Any, &[])
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ProbeDone> {
        self.out.nullable = true;
        visitor.visit_some(self)
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _visitor: V,
    ) -> Result<V::Value, ProbeDone> {
        self.record(name, ElementKind::Primitive, &[])
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ProbeDone> {
        if self.out.serial_name.is_empty() {
            self.out.serial_name = name;
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, ProbeDone> {
        self.record("List", ElementKind::List, &[])
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value, ProbeDone> {
        self.record("Tuple", ElementKind::List, &[])
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value, ProbeDone> {
        self.record(name, ElementKind::List, &[])
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, ProbeDone> {
        self.record("Map", ElementKind::Map, &[])
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, ProbeDone> {
        self.record(name, ElementKind::Class, fields)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, ProbeDone> {
        self.record(name, ElementKind::Enum, variants)
    }
}
