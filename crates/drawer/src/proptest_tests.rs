//! Round-trip properties over both codecs.

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use crate::adapters::{BlockPos, Identifier};
use crate::codec::NbtConfig;
use crate::test_data::{Attitude, CityData, IntData, Reading};
use crate::{Nbt, from_bytes, from_node, to_bytes, to_node};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Sample {
    flag: bool,
    byte: i8,
    short: i16,
    int: i32,
    long: i64,
    unsigned: u32,
    double: f64,
    letter: char,
    text: String,
    maybe: Option<i64>,
    ints: Vec<i32>,
    gaps: Vec<Option<i16>>,
    by_id: BTreeMap<i32, String>,
    by_small: BTreeMap<u8, i32>,
    by_wide: BTreeMap<u64, bool>,
    by_data: BTreeMap<IntData, bool>,
    attitude: Attitude,
    reading: Reading,
    city: Option<CityData>,
    pos: BlockPos,
    id: Identifier,
}

fn attitude() -> impl Strategy<Value = Attitude> {
    prop_oneof![
        Just(Attitude::Positive),
        Just(Attitude::Neutral),
        Just(Attitude::Negative),
    ]
}

fn city() -> impl Strategy<Value = CityData> {
    (any::<i32>(), "[a-zA-Z ]{0,12}").prop_map(|(id, name)| CityData { id, name })
}

fn reading() -> impl Strategy<Value = Reading> {
    prop_oneof![
        Just(Reading::Empty),
        any::<i32>().prop_map(Reading::Count),
        (any::<i32>(), any::<i32>()).prop_map(|(a, b)| Reading::Pair(a, b)),
        city().prop_map(Reading::Located),
        any::<Option<i32>>().prop_map(Reading::Maybe),
    ]
}

fn identifier() -> impl Strategy<Value = Identifier> {
    ("[a-z0-9_.-]{1,8}", "[a-z0-9_./-]{1,16}")
        .prop_map(|(namespace, path)| Identifier::new(namespace, path).unwrap())
}

fn block_pos() -> impl Strategy<Value = BlockPos> {
    (
        -(1i32 << 25)..(1i32 << 25),
        -(1i32 << 11)..(1i32 << 11),
        -(1i32 << 25)..(1i32 << 25),
    )
        .prop_map(|(x, y, z)| BlockPos::new(x, y, z))
}

prop_compose! {
    fn sample()(
        (flag, byte, short, int, long, unsigned) in
            (any::<bool>(), any::<i8>(), any::<i16>(), any::<i32>(), any::<i64>(), any::<u32>()),
        double in -1e12f64..1e12,
        letter in any::<char>(),
        text in ".{0,24}",
        maybe in any::<Option<i64>>(),
        ints in prop::collection::vec(any::<i32>(), 0..8),
        gaps in prop::collection::vec(any::<Option<i16>>(), 0..8),
        by_id in prop::collection::btree_map(any::<i32>(), "[a-z]{0,6}", 0..6),
        by_small in prop::collection::btree_map(any::<u8>(), any::<i32>(), 0..6),
        by_wide in prop::collection::btree_map(any::<u64>(), any::<bool>(), 0..6),
        by_data in prop::collection::btree_map(any::<i32>().prop_map(|int_v| IntData { int_v }), any::<bool>(), 0..4),
        attitude in attitude(),
        reading in reading(),
        city in prop::option::of(city()),
        pos in block_pos(),
        id in identifier(),
    ) -> Sample {
        Sample {
            flag, byte, short, int, long, unsigned, double, letter, text, maybe,
            ints, gaps, by_id, by_small, by_wide, by_data, attitude, reading, city, pos, id,
        }
    }
}

proptest! {
    #[test]
    fn test_tree_round_trip(value in sample()) {
        let node = to_node(&value).unwrap();
        prop_assert_eq!(from_node::<Sample>(&node).unwrap(), value);
    }

    #[test]
    fn test_flat_round_trip(value in sample()) {
        let bytes = to_bytes(&value).unwrap();
        prop_assert_eq!(from_bytes::<Sample>(&bytes).unwrap(), value);
    }

    #[test]
    fn test_nullable_list_round_trip(list in prop::collection::vec(any::<Option<i32>>(), 0..16)) {
        let node = to_node(&list).unwrap();
        prop_assert_eq!(from_node::<Vec<Option<i32>>>(&node).unwrap(), list);
    }

    #[test]
    fn test_legacy_nullable_list_drops_only_trailing_nulls(
        list in prop::collection::vec(any::<Option<i32>>(), 0..16),
    ) {
        let nbt = Nbt::default().with_config(NbtConfig { explicit_list_size: false });
        let node = nbt.encode_to_node(&list).unwrap();
        let decoded: Vec<Option<i32>> = nbt.decode_from_node(&node).unwrap();

        let mut expected = list.clone();
        while expected.last() == Some(&None) {
            expected.pop();
        }
        prop_assert_eq!(decoded, expected);
    }
}
