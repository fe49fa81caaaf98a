//! Round-trip entry points.
//!
//! [`Nbt`] bundles the serializers module and tree options every call needs.
//! The free functions use a shared instance built from [`DEFAULT_MODULE`], or
//! a one-off instance when a context module is passed.
//!
//! Keyed entry points:
//! - [`put`] stores a value in a compound under its type name or an explicit
//!   key, refusing to overwrite an existing entry. `None` stores nothing.
//! - [`get_from`] reads it back. An absent key yields `None` for optional
//!   types and otherwise decodes from an empty compound, so fields with
//!   defaults still produce a value.
//!
//! Flat entry points:
//! - [`write`] / [`read_from`] append to and consume from shared buffers,
//!   always with a presence marker in front.
//! - [`to_bytes`] / [`from_bytes`] encode exactly one value.

use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codec::tree::{self, Context};
use crate::codec::{BufDecoder, BufEncoder, NbtConfig, Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::BufLimits;
use crate::model::{Compound, NULL, Node};
use crate::schema::{DEFAULT_MODULE, Descriptor, SerializersModule};

lazy_static! {
    static ref DEFAULT_NBT: Nbt = Nbt::default();
    static ref EMPTY_COMPOUND: Node = Node::Compound(Compound::new());
}

/// Serializers module and options for the tree and flat codecs.
#[derive(Debug, Clone)]
pub struct Nbt {
    module: SerializersModule,
    config: NbtConfig,
    limits: BufLimits,
}

impl Default for Nbt {
    fn default() -> Self {
        Self {
            module: DEFAULT_MODULE.clone(),
            config: NbtConfig::default(),
            limits: BufLimits::default(),
        }
    }
}

impl Nbt {
    /// Creates an instance whose module is `context` layered over the defaults.
    pub fn new(context: &SerializersModule) -> Self {
        Self {
            module: DEFAULT_MODULE.overwritten_by(context),
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: NbtConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_limits(mut self, limits: BufLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn module(&self) -> &SerializersModule {
        &self.module
    }

    pub fn config(&self) -> NbtConfig {
        self.config
    }

    pub fn limits(&self) -> BufLimits {
        self.limits
    }

    fn context(&self) -> Context<'_> {
        Context {
            module: &self.module,
            config: self.config,
        }
    }

    // =========================================================================
    // TREE
    // =========================================================================

    /// Encodes a value as a node. A root `None` becomes [`NULL`].
    pub fn encode_to_node<T: ?Sized + Serialize>(&self, value: &T) -> Result<Node, EncodeError> {
        tree::encode(self.context(), value)
    }

    pub fn decode_from_node<'de, T: Deserialize<'de>>(&self, node: &'de Node) -> Result<T, DecodeError> {
        tree::decode(self.context(), node)
    }

    /// Stores `value` in `into` under `key`, defaulting to the type's serial name.
    ///
    /// Fails with [`EncodeError::DuplicateKey`] if the key is taken, even when
    /// `value` is `None` and nothing would be written.
    pub fn put<T: Serialize + DeserializeOwned>(
        &self,
        value: Option<&T>,
        into: &mut Compound,
        key: Option<&str>,
    ) -> Result<(), EncodeError> {
        let used_key = key.unwrap_or_else(|| Descriptor::of::<T>().serial_name());
        if into.contains_key(used_key) {
            return Err(EncodeError::DuplicateKey {
                key: used_key.to_owned(),
            });
        }
        let Some(value) = value else {
            tracing::debug!(key = used_key, "put: absent value, nothing written");
            return Ok(());
        };
        let node = self.encode_to_node(value)?;
        tracing::debug!(key = used_key, kind = %node.kind(), "put");
        into.insert(used_key, node);
        Ok(())
    }

    /// Reads the value stored under `key`, defaulting to the type's serial name.
    pub fn get_from<'de, T: Deserialize<'de>>(
        &self,
        from: &'de Compound,
        key: Option<&str>,
    ) -> Result<T, DecodeError> {
        let descriptor = Descriptor::of::<T>();
        let used_key = key.unwrap_or(descriptor.serial_name());
        let node = match from.get(used_key) {
            Some(node) => node,
            None if descriptor.is_nullable() => {
                tracing::debug!(key = used_key, "get_from: absent, reading null");
                &NULL
            }
            None => {
                tracing::debug!(key = used_key, "get_from: absent, reading defaults");
                &*EMPTY_COMPOUND
            }
        };
        self.decode_from_node(node)
    }

    // =========================================================================
    // FLAT
    // =========================================================================

    /// Appends a presence marker and, if present, the value.
    pub fn write<T: ?Sized + Serialize>(&self, value: Option<&T>, to: &mut Writer) -> Result<(), EncodeError> {
        let mut encoder = BufEncoder::new(to);
        encoder.write_marker(value.is_some());
        match value {
            Some(value) => value.serialize(&mut encoder),
            None => Ok(()),
        }
    }

    /// Reads a value written by [`write`](Nbt::write), advancing `from` past it.
    pub fn read_from<'de, T: Deserialize<'de>>(&self, from: &mut Reader<'de>) -> Result<Option<T>, DecodeError> {
        let mut decoder = BufDecoder::from_reader(from.clone(), self.limits);
        let value = if decoder.read_marker()? {
            Some(T::deserialize(&mut decoder)?)
        } else {
            None
        };
        *from = decoder.into_reader();
        Ok(value)
    }

    /// Encodes one value as a flat buffer, with no presence marker.
    pub fn to_bytes<T: ?Sized + Serialize>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        value.serialize(&mut BufEncoder::new(&mut writer))?;
        Ok(writer.into_bytes())
    }

    /// Decodes one value from a flat buffer, rejecting trailing bytes.
    pub fn from_bytes<'de, T: Deserialize<'de>>(&self, bytes: &'de [u8]) -> Result<T, DecodeError> {
        let mut decoder = BufDecoder::with_limits(bytes, self.limits);
        let value = T::deserialize(&mut decoder)?;
        decoder.end()?;
        Ok(value)
    }
}

fn with_context<R>(context: Option<&SerializersModule>, f: impl FnOnce(&Nbt) -> R) -> R {
    match context {
        Some(context) => f(&Nbt::new(context)),
        None => f(&DEFAULT_NBT),
    }
}

/// Encodes a value as a node with the default module.
pub fn to_node<T: ?Sized + Serialize>(value: &T) -> Result<Node, EncodeError> {
    DEFAULT_NBT.encode_to_node(value)
}

/// Decodes a value from a node with the default module.
pub fn from_node<'de, T: Deserialize<'de>>(node: &'de Node) -> Result<T, DecodeError> {
    DEFAULT_NBT.decode_from_node(node)
}

/// See [`Nbt::put`].
pub fn put<T: Serialize + DeserializeOwned>(
    value: Option<&T>,
    into: &mut Compound,
    key: Option<&str>,
    context: Option<&SerializersModule>,
) -> Result<(), EncodeError> {
    with_context(context, |nbt| nbt.put(value, into, key))
}

/// See [`Nbt::get_from`].
pub fn get_from<'de, T: Deserialize<'de>>(
    from: &'de Compound,
    key: Option<&str>,
    context: Option<&SerializersModule>,
) -> Result<T, DecodeError> {
    with_context(context, |nbt| nbt.get_from(from, key))
}

/// See [`Nbt::write`].
pub fn write<T: ?Sized + Serialize>(value: Option<&T>, to: &mut Writer) -> Result<(), EncodeError> {
    DEFAULT_NBT.write(value, to)
}

/// See [`Nbt::read_from`].
pub fn read_from<'de, T: Deserialize<'de>>(from: &mut Reader<'de>) -> Result<Option<T>, DecodeError> {
    DEFAULT_NBT.read_from(from)
}

/// See [`Nbt::to_bytes`].
pub fn to_bytes<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    DEFAULT_NBT.to_bytes(value)
}

/// See [`Nbt::from_bytes`].
pub fn from_bytes<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T, DecodeError> {
    DEFAULT_NBT.from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::adapters::{BlockPos, Identifier};
    use crate::codec::SIZE_KEY;
    use crate::model::NodeList;
    use crate::test_data::*;

    fn city(id: i32, name: &str) -> CityData {
        CityData {
            id,
            name: name.to_owned(),
        }
    }

    // =========================================================================
    // TREE SHAPES
    // =========================================================================

    #[test]
    fn test_struct_shape() {
        let node = to_node(&city(1, "foo")).unwrap();
        assert_eq!(node, Node::Compound(Compound::new().with("id", 1).with("name", "foo")));
    }

    #[test]
    fn test_nested_shape_and_null_field() {
        let street = StreetData2 {
            id: 2,
            name: "Bar".into(),
            city: None,
        };
        let node = to_node(&street).unwrap();
        let compound = node.as_compound().unwrap();
        assert_eq!(compound.get("city"), Some(&Node::End));
        assert_eq!(from_node::<StreetData2>(&node).unwrap(), street);
    }

    #[test]
    fn test_primitive_mapping() {
        let numbers = VariousNumbers::sample();
        let node = to_node(&numbers).unwrap();
        let compound = node.as_compound().unwrap();
        assert_eq!(compound.get("byte"), Some(&Node::Byte(-3)));
        assert_eq!(compound.get("short"), Some(&Node::Short(300)));
        assert_eq!(compound.get("long"), Some(&Node::Long(1 << 40)));
        assert_eq!(compound.get("unsigned"), Some(&Node::Long(-1)));
        assert_eq!(compound.get("flag"), Some(&Node::Byte(1)));
        assert_eq!(compound.get("letter"), Some(&Node::String("λ".into())));
        assert_eq!(from_node::<VariousNumbers>(&node).unwrap(), numbers);
    }

    #[test]
    fn test_numeric_coercion() {
        let node = Node::Compound(Compound::new().with("id", Node::Long(7)).with("name", "x"));
        assert_eq!(from_node::<CityData>(&node).unwrap(), city(7, "x"));

        let node = Node::Compound(Compound::new().with("id", "12").with("name", "x"));
        assert_eq!(from_node::<CityData>(&node).unwrap(), city(12, "x"));
    }

    #[test]
    fn test_numeric_coercion_rejects_lossy_values() {
        assert!(matches!(
            from_node::<i8>(&Node::Int(300)),
            Err(DecodeError::TypeMismatch { .. })
        ));
        assert_eq!(from_node::<i8>(&Node::Int(-100)).unwrap(), -100);
        assert!(matches!(
            from_node::<i32>(&Node::Double(1.9)),
            Err(DecodeError::TypeMismatch { .. })
        ));
        assert_eq!(from_node::<i32>(&Node::Double(2.0)).unwrap(), 2);
        assert!(from_node::<u32>(&Node::Long(1 << 40)).is_err());

        assert_eq!(from_node::<u8>(&Node::Byte(-56)).unwrap(), 200);
        assert_eq!(from_node::<u8>(&Node::Int(200)).unwrap(), 200);
        assert!(matches!(
            from_node::<u8>(&Node::Int(-200)),
            Err(DecodeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_type_mismatch_carries_path() {
        let node = Node::Compound(
            Compound::new()
                .with("id", 1)
                .with("name", "street")
                .with("city", Compound::new().with("id", "not a number").with("name", "c")),
        );
        let err = from_node::<StreetData>(&node).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { .. }));
        assert_eq!(err.path(), Some("city.id"));
    }

    #[test]
    fn test_list_of_structs() {
        let county = CountyData {
            name: "county".into(),
            cities: vec![city(1, "a"), city(2, "b")],
        };
        let node = to_node(&county).unwrap();
        let cities = node.as_compound().unwrap().get("cities").unwrap();
        assert_eq!(cities.as_list().map(NodeList::len), Some(2));
        assert_eq!(from_node::<CountyData>(&node).unwrap(), county);
    }

    #[test]
    fn test_zoo_round_trip() {
        let zoo = Zoo::sample();
        let node = to_node(&zoo).unwrap();
        assert_eq!(from_node::<Zoo>(&node).unwrap(), zoo);
    }

    #[test]
    fn test_recursive_tree() {
        let tree = Tree::sample();
        assert_eq!(from_node::<Tree>(&to_node(&tree).unwrap()).unwrap(), tree);
    }

    // =========================================================================
    // MAPS
    // =========================================================================

    #[test]
    fn test_primitive_keys_make_a_compound() {
        let map: BTreeMap<i32, String> = [(1, "one".into()), (20, "twenty".into()), (-3, "x".into())].into();
        let node = to_node(&map).unwrap();
        let compound = node.as_compound().unwrap();
        assert_eq!(compound.len(), 3);
        assert_eq!(compound.get("20"), Some(&Node::String("twenty".into())));
        assert_eq!(from_node::<BTreeMap<i32, String>>(&node).unwrap(), map);
    }

    #[test]
    fn test_enum_keys_make_a_compound() {
        let map: BTreeMap<Attitude, i32> = [(Attitude::Positive, 1), (Attitude::Negative, -1)].into();
        let node = to_node(&map).unwrap();
        assert_eq!(node.as_compound().unwrap().get("Negative"), Some(&Node::Int(-1)));
        assert_eq!(from_node::<BTreeMap<Attitude, i32>>(&node).unwrap(), map);
    }

    #[test]
    fn test_composite_keys_make_a_pair_list() {
        let map: BTreeMap<IntData, String> = [
            (IntData { int_v: 1 }, "a".into()),
            (IntData { int_v: 2 }, "b".into()),
            (IntData { int_v: 3 }, "c".into()),
        ]
        .into();
        let node = to_node(&map).unwrap();
        let list = node.as_list().unwrap();
        assert_eq!(list.len(), 2 * map.len());
        assert_eq!(
            list.get(0),
            Some(&Node::Compound(Compound::new().with("int_v", 1)))
        );
        assert_eq!(list.get(1), Some(&Node::String("a".into())));
        assert_eq!(from_node::<BTreeMap<IntData, String>>(&node).unwrap(), map);
    }

    #[test]
    fn test_unsigned_keys_round_trip() {
        let small: BTreeMap<u8, i32> = [(200, 1), (7, 2)].into();
        let node = to_node(&small).unwrap();
        assert_eq!(node.as_compound().unwrap().get("-56"), Some(&Node::Int(1)));
        assert_eq!(from_node::<BTreeMap<u8, i32>>(&node).unwrap(), small);

        let wide: BTreeMap<u64, bool> = [(u64::MAX, true), (0, false)].into();
        let node = to_node(&wide).unwrap();
        assert_eq!(from_node::<BTreeMap<u64, bool>>(&node).unwrap(), wide);
    }

    #[test]
    fn test_null_key_rejected() {
        let map: BTreeMap<Option<i32>, i32> = [(None, 1), (Some(2), 2)].into();
        let err = to_node(&map).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidKeyKind { .. }));
    }

    #[test]
    fn test_inline_text_map_value() {
        let node = Node::Compound(Compound::new().with("first", r#"{"int_v": 5}"#));
        let map: BTreeMap<String, IntData> = from_node(&node).unwrap();
        assert_eq!(map["first"], IntData { int_v: 5 });

        let node = Node::Compound(Compound::new().with("first", "{not json"));
        let err = from_node::<BTreeMap<String, IntData>>(&node).unwrap_err();
        assert!(matches!(err, DecodeError::InlineText { .. }));
    }

    // =========================================================================
    // NULLABLE LISTS
    // =========================================================================

    #[test]
    fn test_nullable_list_with_middle_null() {
        let list = vec![Some(4), None, Some(5)];
        let node = to_node(&list).unwrap();
        let compound = node.as_compound().unwrap();
        assert_eq!(compound.get("0"), Some(&Node::Int(4)));
        assert!(!compound.contains_key("1"));
        assert_eq!(compound.get("2"), Some(&Node::Int(5)));
        assert_eq!(from_node::<Vec<Option<i32>>>(&node).unwrap(), list);
    }

    #[test]
    fn test_trailing_null_kept_with_size() {
        let list = vec![Some(4), Some(5), None];
        let node = to_node(&list).unwrap();
        assert_eq!(node.as_compound().unwrap().get(SIZE_KEY), Some(&Node::Int(3)));
        assert_eq!(from_node::<Vec<Option<i32>>>(&node).unwrap(), list);
    }

    #[test]
    fn test_trailing_null_dropped_without_size() {
        let nbt = Nbt::default().with_config(NbtConfig {
            explicit_list_size: false,
        });
        let list = vec![Some(4), Some(5), None];
        let node = nbt.encode_to_node(&list).unwrap();
        assert!(!node.as_compound().unwrap().contains_key(SIZE_KEY));
        let decoded: Vec<Option<i32>> = nbt.decode_from_node(&node).unwrap();
        assert_eq!(decoded, vec![Some(4), Some(5)]);
    }

    #[test]
    fn test_nullable_list_size_is_bounded() {
        let node = Node::Compound(Compound::new().with(SIZE_KEY, Node::Int(i32::MAX)));
        let err = from_node::<Vec<Option<i32>>>(&node).unwrap_err();
        assert!(matches!(err, DecodeError::LengthExceedsLimit { .. }));

        let node = Node::Compound(Compound::new().with("4000000000", 1));
        let err = from_node::<Vec<Option<i32>>>(&node).unwrap_err();
        assert!(matches!(err, DecodeError::LengthExceedsLimit { .. }));
    }

    #[test]
    fn test_optional_elements_always_use_a_compound() {
        let node = to_node(&vec![Some(1), Some(2)]).unwrap();
        assert_eq!(node.kind(), crate::NodeKind::Compound);
        assert_eq!(to_node(&vec![1, 2]).unwrap().kind(), crate::NodeKind::List);
    }

    // =========================================================================
    // ENUMS AND POLYMORPHISM
    // =========================================================================

    #[test]
    fn test_unit_variant_by_name_or_ordinal() {
        assert_eq!(to_node(&Attitude::Neutral).unwrap(), Node::String("Neutral".into()));
        assert_eq!(from_node::<Attitude>(&Node::Int(2)).unwrap(), Attitude::Negative);
        assert!(matches!(
            from_node::<Attitude>(&Node::Int(7)),
            Err(DecodeError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_struct_variant_gets_discriminator() {
        let wrapper = MessageWrapper {
            message: Message::Str { text: "hi".into() },
        };
        let node = to_node(&wrapper).unwrap();
        let message = node.as_compound().unwrap().get("message").unwrap();
        assert_eq!(
            message,
            &Node::Compound(Compound::new().with("type", "Str").with("text", "hi"))
        );
        assert_eq!(from_node::<MessageWrapper>(&node).unwrap(), wrapper);
    }

    #[test]
    fn test_registered_serial_names() {
        let module = SerializersModule::new()
            .polymorphic("Message", "Int", "message.int")
            .polymorphic("Message", "Str", "message.str");
        let nbt = Nbt::new(&module);
        let messages = vec![Message::Int { number: 3 }, Message::Str { text: "x".into() }];
        let node = nbt.encode_to_node(&messages).unwrap();
        let first = node.as_list().unwrap().get(0).unwrap();
        assert_eq!(
            first.as_compound().unwrap().get("type"),
            Some(&Node::String("message.int".into()))
        );
        assert_eq!(nbt.decode_from_node::<Vec<Message>>(&node).unwrap(), messages);

        let err = from_node::<Vec<Message>>(&node).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownVariant { .. }));
        assert_eq!(err.path(), Some("0"));
    }

    #[test]
    fn test_custom_discriminator() {
        let nbt = Nbt::new(&SerializersModule::new().with_class_discriminator("kind"));
        let node = nbt.encode_to_node(&Message::Int { number: 1 }).unwrap();
        assert_eq!(node.as_compound().unwrap().get("kind"), Some(&Node::String("Int".into())));
        assert_eq!(
            nbt.decode_from_node::<Message>(&node).unwrap(),
            Message::Int { number: 1 }
        );
    }

    #[test]
    fn test_missing_discriminator() {
        let node = Node::Compound(Compound::new().with("number", 1));
        assert!(matches!(
            from_node::<Message>(&node),
            Err(DecodeError::MissingDiscriminator { .. })
        ));
    }

    #[test]
    fn test_discriminator_conflict() {
        let err = to_node(&Tagged::Labelled {
            r#type: "oops".into(),
        })
        .unwrap_err();
        assert!(matches!(err, EncodeError::DiscriminatorConflict { .. }));
    }

    #[test]
    fn test_non_struct_payloads_use_value_key() {
        let count = Reading::Count(9);
        let node = to_node(&count).unwrap();
        assert_eq!(
            node,
            Node::Compound(Compound::new().with("type", "Count").with("value", 9))
        );

        for reading in Reading::samples() {
            let node = to_node(&reading).unwrap();
            assert_eq!(from_node::<Reading>(&node).unwrap(), reading);
        }
    }

    #[test]
    fn test_optional_struct_payload_stays_under_value_key() {
        let filled = Holder::Filled(Some(Slot {
            value: None,
            count: 3,
        }));
        let node = to_node(&filled).unwrap();
        assert_eq!(
            node,
            Node::Compound(
                Compound::new().with("type", "Filled").with(
                    "value",
                    Compound::new().with("value", Node::End).with("count", 3)
                )
            )
        );
        assert_eq!(from_node::<Holder>(&node).unwrap(), filled);

        for holder in [
            Holder::Filled(None),
            Holder::Filled(Some(Slot {
                value: Some(1),
                count: 0,
            })),
            Holder::Bare(Slot {
                value: None,
                count: 2,
            }),
        ] {
            let node = to_node(&holder).unwrap();
            assert_eq!(from_node::<Holder>(&node).unwrap(), holder);
            assert_eq!(from_bytes::<Holder>(&to_bytes(&holder).unwrap()).unwrap(), holder);
        }
    }

    // =========================================================================
    // ROOT VALUES
    // =========================================================================

    #[test]
    fn test_root_null() {
        let node = to_node(&None::<CityData>).unwrap();
        assert_eq!(node, NULL);
        assert_eq!(from_node::<Option<CityData>>(&node).unwrap(), None);
    }

    #[test]
    fn test_root_nullable_primitive() {
        assert_eq!(to_node(&Some(5i32)).unwrap(), Node::Int(5));
        assert_eq!(from_node::<Option<i32>>(&Node::Int(5)).unwrap(), Some(5));
        assert_eq!(to_node(&None::<i32>).unwrap(), Node::End);
        assert_eq!(from_node::<Option<i32>>(&Node::End).unwrap(), None);
    }

    #[test]
    fn test_node_passes_through() {
        let node = Node::Compound(
            Compound::new()
                .with("ints", Node::IntArray(vec![1, 2]))
                .with("bytes", Node::ByteArray(vec![-1, 0])),
        );
        assert_eq!(to_node(&node).unwrap(), node);
        assert_eq!(from_node::<Node>(&node).unwrap(), node);
    }

    // =========================================================================
    // PUT / GET_FROM
    // =========================================================================

    #[test]
    fn test_put_uses_type_name() {
        let mut compound = Compound::new();
        put(Some(&city(1, "a")), &mut compound, None, None).unwrap();
        assert!(compound.contains_key("CityData"));
        assert_eq!(get_from::<CityData>(&compound, None, None).unwrap(), city(1, "a"));
    }

    #[test]
    fn test_put_duplicate_key() {
        let mut compound = Compound::new();
        put(Some(&city(1, "a")), &mut compound, None, None).unwrap();
        let err = put(Some(&city(2, "b")), &mut compound, None, None).unwrap_err();
        assert_eq!(
            err,
            EncodeError::DuplicateKey {
                key: "CityData".into()
            }
        );
        let err = put(None::<&CityData>, &mut compound, None, None).unwrap_err();
        assert!(matches!(err, EncodeError::DuplicateKey { .. }));
    }

    #[test]
    fn test_put_distinct_keys() {
        let mut compound = Compound::new();
        put(Some(&city(1, "a")), &mut compound, Some("first"), None).unwrap();
        put(Some(&city(2, "b")), &mut compound, Some("second"), None).unwrap();
        assert_eq!(get_from::<CityData>(&compound, Some("first"), None).unwrap(), city(1, "a"));
        assert_eq!(get_from::<CityData>(&compound, Some("second"), None).unwrap(), city(2, "b"));
    }

    #[test]
    fn test_put_none_writes_nothing() {
        let mut compound = Compound::new();
        put(None::<&CityData>, &mut compound, None, None).unwrap();
        assert!(compound.is_empty());
        assert_eq!(get_from::<Option<CityData>>(&compound, Some("CityData"), None).unwrap(), None);
    }

    #[test]
    fn test_default_fallback() {
        let data = DefaultedData {
            uuid: Some(uuid::Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0)),
            block_pos: BlockPos::new(6, 7, 8),
            id: Identifier::new("holy", "gradle").unwrap(),
        };
        let mut compound = Compound::new();
        put(Some(&data), &mut compound, None, None).unwrap();
        assert_eq!(get_from::<DefaultedData>(&compound, None, None).unwrap(), data);

        let stored = compound
            .get_mut("DefaultedData")
            .and_then(Node::as_compound_mut)
            .unwrap();
        for field in ["uuid", "block_pos", "id"] {
            assert!(stored.remove(field).is_some());
        }
        assert_eq!(
            get_from::<DefaultedData>(&compound, None, None).unwrap(),
            DefaultedData::default()
        );
    }

    #[test]
    fn test_empty_compound_yields_defaults() {
        let compound = Compound::new();
        assert_eq!(
            get_from::<DefaultedData>(&compound, None, None).unwrap(),
            DefaultedData::default()
        );
        assert_eq!(get_from::<SimpleObj>(&compound, None, None).unwrap(), SimpleObj::default());
    }

    #[test]
    fn test_put_with_context() {
        let module = SerializersModule::new().polymorphic("Message", "Int", "int");
        let mut compound = Compound::new();
        let message = Message::Int { number: 4 };
        put(Some(&message), &mut compound, None, Some(&module)).unwrap();
        assert_eq!(
            get_from::<Message>(&compound, None, Some(&module)).unwrap(),
            message
        );
    }

    // =========================================================================
    // FLAT
    // =========================================================================

    #[test]
    fn test_write_read_share_a_buffer() {
        let mut writer = Writer::new();
        write(Some(&city(1, "a")), &mut writer).unwrap();
        write(None::<&CityData>, &mut writer).unwrap();
        write(Some(&Attitude::Negative), &mut writer).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = Reader::new(&bytes);
        assert_eq!(read_from::<CityData>(&mut reader).unwrap(), Some(city(1, "a")));
        assert_eq!(read_from::<CityData>(&mut reader).unwrap(), None);
        assert_eq!(read_from::<Attitude>(&mut reader).unwrap(), Some(Attitude::Negative));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_root_null_in_flat_buffer() {
        let mut writer = Writer::new();
        write(None::<&i32>, &mut writer).unwrap();
        assert_eq!(writer.as_bytes(), &[0]);

        let mut writer = Writer::new();
        write(Some(&7i32), &mut writer).unwrap();
        assert_eq!(writer.as_bytes(), &[1, 0, 0, 0, 7]);
    }

    #[test]
    fn test_bytes_round_trip() {
        let data = DefaultedData::default();
        let bytes = to_bytes(&data).unwrap();
        assert_eq!(from_bytes::<DefaultedData>(&bytes).unwrap(), data);
    }

    #[test]
    fn test_underrun_through_facade() {
        let bytes = to_bytes(&city(1, "abc")).unwrap();
        assert!(matches!(
            from_bytes::<CityData>(&bytes[..bytes.len() - 1]),
            Err(DecodeError::BufferUnderrun { .. })
        ));
    }
}
