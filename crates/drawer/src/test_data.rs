//! Sample types shared by the test modules.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapters::{BlockPos, Identifier, Vec3d};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityData {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetData {
    pub id: i32,
    pub name: String,
    pub city: CityData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetData2 {
    pub id: i32,
    pub name: String,
    pub city: Option<CityData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyData {
    pub name: String,
    pub cities: Vec<CityData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attitude {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntData {
    pub int_v: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariousNumbers {
    pub byte: i8,
    pub short: i16,
    pub int: i32,
    pub long: i64,
    pub float: f32,
    pub double: f64,
    pub unsigned: u64,
    pub flag: bool,
    pub letter: char,
}

impl VariousNumbers {
    pub fn sample() -> Self {
        Self {
            byte: -3,
            short: 300,
            int: -70_000,
            long: 1 << 40,
            float: 1.5,
            double: -0.1,
            unsigned: u64::MAX,
            flag: true,
            letter: 'λ',
        }
    }
}

/// Recursive binary tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub name: String,
    pub left: Option<Box<Tree>>,
    pub right: Option<Box<Tree>>,
}

impl Tree {
    fn leaf(name: &str) -> Box<Tree> {
        Box::new(Tree {
            name: name.to_owned(),
            left: None,
            right: None,
        })
    }

    pub fn sample() -> Self {
        Tree {
            name: "root".into(),
            left: Some(Box::new(Tree {
                name: "left".into(),
                left: Some(Tree::leaf("left.left")),
                right: None,
            })),
            right: Some(Tree::leaf("right")),
        }
    }
}

/// One field of every shape the codecs handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zoo {
    pub unit: (),
    pub boolean: bool,
    pub byte: i8,
    pub short: i16,
    pub int: i32,
    pub long: i64,
    pub float: f32,
    pub double: f64,
    pub character: char,
    pub string: String,
    pub unsigned_byte: u8,
    pub nullable_int: Option<i32>,
    pub nullable_string: Option<String>,
    pub attitude: Attitude,
    pub int_data: IntData,
    pub nullable_data: Option<IntData>,
    pub list_int: Vec<i32>,
    pub list_nullable_int: Vec<Option<i32>>,
    pub list_list_int: Vec<Vec<i32>>,
    pub list_int_data: Vec<IntData>,
    pub tuple: (i16, String),
    pub map_int_string: BTreeMap<i32, String>,
    pub map_attitude_int: BTreeMap<Attitude, i32>,
    pub map_string_data: HashMap<String, IntData>,
    pub map_data_int: BTreeMap<IntData, i32>,
    pub map_nullable_value: BTreeMap<String, Option<i32>>,
    pub reading: Reading,
    pub position: Vec3d,
}

impl Zoo {
    pub fn sample() -> Self {
        Zoo {
            unit: (),
            boolean: true,
            byte: 10,
            short: -1000,
            int: 100_000,
            long: -(1 << 50),
            float: 0.25,
            double: 1e100,
            character: 'z',
            string: "Zoo".into(),
            unsigned_byte: 200,
            nullable_int: Some(5),
            nullable_string: None,
            attitude: Attitude::Negative,
            int_data: IntData { int_v: 42 },
            nullable_data: None,
            list_int: vec![1, 2, 3],
            list_nullable_int: vec![Some(1), None, Some(3)],
            list_list_int: vec![vec![1], vec![], vec![2, 3]],
            list_int_data: vec![IntData { int_v: 1 }, IntData { int_v: 2 }],
            tuple: (7, "seven".into()),
            map_int_string: [(1, "one".into()), (2, "two".into())].into(),
            map_attitude_int: [(Attitude::Positive, 1), (Attitude::Neutral, 0)].into(),
            map_string_data: [("k".to_owned(), IntData { int_v: 9 })].into(),
            map_data_int: [(IntData { int_v: 3 }, 30), (IntData { int_v: 4 }, 40)].into(),
            map_nullable_value: [("a".to_owned(), Some(1)), ("b".to_owned(), None)].into(),
            reading: Reading::Pair(-1, 1),
            position: Vec3d::new(0.5, 64.0, -0.5),
        }
    }
}

/// Struct variants, stored with the discriminator next to their fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    Int { number: i32 },
    Str { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageWrapper {
    pub message: Message,
}

/// One variant of each non-struct payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reading {
    Empty,
    Count(i32),
    Pair(i32, i32),
    Located(CityData),
    Maybe(Option<i32>),
}

impl Reading {
    pub fn samples() -> Vec<Reading> {
        vec![
            Reading::Empty,
            Reading::Count(3),
            Reading::Pair(4, 5),
            Reading::Located(CityData {
                id: 1,
                name: "here".into(),
            }),
            Reading::Maybe(Some(2)),
            Reading::Maybe(None),
        ]
    }
}

/// A struct whose field shares its name with the polymorphic payload key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub value: Option<i32>,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Holder {
    Filled(Option<Slot>),
    Bare(Slot),
}

/// A variant whose field clashes with the default class discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tagged {
    Labelled { r#type: String },
}

fn default_block_pos() -> BlockPos {
    BlockPos::new(1, 2, 3)
}

fn default_identifier() -> Identifier {
    Identifier::new("minecraft", "carrot").unwrap()
}

/// Every field has a declared default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultedData {
    #[serde(with = "crate::adapters::uuid::option", default)]
    pub uuid: Option<Uuid>,
    #[serde(default = "default_block_pos")]
    pub block_pos: BlockPos,
    #[serde(default = "default_identifier")]
    pub id: Identifier,
}

impl Default for DefaultedData {
    fn default() -> Self {
        Self {
            uuid: None,
            block_pos: default_block_pos(),
            id: default_identifier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleObj {
    pub x: i32,
    pub y: String,
}

impl Default for SimpleObj {
    fn default() -> Self {
        Self {
            x: 3,
            y: "asdf".into(),
        }
    }
}
