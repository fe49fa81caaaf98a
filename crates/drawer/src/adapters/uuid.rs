//! UUIDs as a two-field structure of signed 64-bit halves.
//!
//! Use with `#[serde(with = "drawer::adapters::uuid")]`, the [`option`]
//! submodule for `Option<Uuid>`, or wrap the value in [`SerialUuid`].
//!
//! Decoding requires both halves, in order. A structure with only one half
//! present is rejected rather than completed from defaults.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const NAME: &str = "Uuid";
const FIELDS: &[&str] = &["most", "least"];

/// Splits a UUID into its most and least significant halves.
pub fn to_halves(uuid: &Uuid) -> (i64, i64) {
    let (most, least) = uuid.as_u64_pair();
    (most as i64, least as i64)
}

pub fn from_halves(most: i64, least: i64) -> Uuid {
    Uuid::from_u64_pair(most as u64, least as u64)
}

pub fn serialize<S: Serializer>(uuid: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
    let (most, least) = to_halves(uuid);
    let mut s = serializer.serialize_struct(NAME, 2)?;
    s.serialize_field(FIELDS[0], &most)?;
    s.serialize_field(FIELDS[1], &least)?;
    s.end()
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
    deserializer.deserialize_struct(NAME, FIELDS, HalvesVisitor)
}

struct HalvesVisitor;

impl<'de> Visitor<'de> for HalvesVisitor {
    type Value = Uuid;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a UUID as fields `most` then `least`")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Uuid, A::Error> {
        let mut halves = [0i64; 2];
        for (index, &expected) in FIELDS.iter().enumerate() {
            match map.next_key::<String>()? {
                Some(key) if key == expected => halves[index] = map.next_value()?,
                Some(key) => return Err(de::Error::unknown_field(&key, FIELDS)),
                None => return Err(de::Error::missing_field(expected)),
            }
        }
        if let Some(key) = map.next_key::<String>()? {
            return Err(de::Error::unknown_field(&key, FIELDS));
        }
        Ok(from_halves(halves[0], halves[1]))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Uuid, A::Error> {
        let most = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let least = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        Ok(from_halves(most, least))
    }
}

/// A [`Uuid`] that serializes as its two halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SerialUuid(pub Uuid);

impl Serialize for SerialUuid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for SerialUuid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize(deserializer).map(SerialUuid)
    }
}

impl From<Uuid> for SerialUuid {
    fn from(uuid: Uuid) -> Self {
        SerialUuid(uuid)
    }
}

/// The same layout for `Option<Uuid>`.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    use super::SerialUuid;

    pub fn serialize<S: Serializer>(uuid: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error> {
        match uuid {
            Some(uuid) => serializer.serialize_some(&SerialUuid(*uuid)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Uuid>, D::Error> {
        Option::<SerialUuid>::deserialize(deserializer).map(|uuid| uuid.map(|u| u.0))
    }
}
