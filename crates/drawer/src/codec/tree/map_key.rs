//! Deserializer for compound keys standing in for map keys.
//!
//! Keys were written with `Display`, so each primitive request parses the key
//! back with `FromStr`. Only key types whose string form round-trips exactly
//! are supported.

use serde::de::{self, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use crate::error::DecodeError;
use crate::schema::SerializersModule;

pub(super) struct MapKeyDecoder<'de, 'a> {
    key: &'de str,
    module: &'a SerializersModule,
}

impl<'de, 'a> MapKeyDecoder<'de, 'a> {
    pub(super) fn new(key: &'de str, module: &'a SerializersModule) -> Self {
        Self { key, module }
    }

    fn parse<T: std::str::FromStr>(&self, expected: &'static str) -> Result<T, DecodeError> {
        self.key.parse().map_err(|_| self.mismatch(expected))
    }

    fn mismatch(&self, expected: &'static str) -> DecodeError {
        DecodeError::mismatch(expected, format_args!("map key {:?}", self.key))
    }
}

macro_rules! parse_key {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
                visitor.$visit(self.parse::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

// Unsigned keys are stringified from the signed node they were stored as.
macro_rules! parse_unsigned_key {
    ($($method:ident => $visit:ident: $ty:ty as $signed:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
                let value = match self.key.parse::<$ty>() {
                    Ok(v) => v,
                    Err(_) => self.parse::<$signed>(stringify!($ty))? as $ty,
                };
                visitor.$visit(value)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for MapKeyDecoder<'de, '_> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_borrowed_str(self.key)
    }

    parse_key! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
        deserialize_char => visit_char: char,
    }

    parse_unsigned_key! {
        deserialize_u8 => visit_u8: u8 as i8,
        deserialize_u16 => visit_u16: u16 as i16,
        deserialize_u32 => visit_u32: u32 as i32,
        deserialize_u64 => visit_u64: u64 as i64,
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.key {
            "1" | "true" => visitor.visit_bool(true),
            "0" | "false" => visitor.visit_bool(false),
            _ => Err(DecodeError::mismatch("bool", format_args!("map key {:?}", self.key))),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_borrowed_str(self.key)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_borrowed_str(self.key)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_borrowed_str(self.key)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_borrowed_bytes(self.key.as_bytes())
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        let resolved = self.module.variant_of(name, self.key);
        match variants.iter().find(|v| **v == resolved) {
            Some(variant) => visitor.visit_enum((*variant).into_deserializer()),
            None => Err(de::Error::unknown_variant(self.key, variants)),
        }
    }

    forward_to_deserialize_any! {
        i128 u128 unit unit_struct seq tuple tuple_struct map struct ignored_any
    }
}
