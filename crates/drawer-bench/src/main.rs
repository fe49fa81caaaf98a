//! Benchmark for drawer serialization using city data.
//!
//! Encodes a large dataset (153k cities) through the tree codec, the flat
//! codec and JSON, and compares sizes and timings.

use std::collections::HashMap;
use std::fs;
use std::time::Instant;

use drawer::adapters::{Identifier, SerialUuid, Vec3d};
use drawer::{Compound, Node, SerializersModule};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// JSON DATA STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct City {
    id: u32,
    name: String,
    state_id: u32,
    state_code: String,
    state_name: String,
    country_id: u32,
    country_code: String,
    country_name: String,
    latitude: String,
    longitude: String,
    native: Option<String>,
    #[serde(rename = "type")]
    city_type: Option<String>,
    population: Option<i64>,
    timezone: Option<String>,
    translations: Option<HashMap<String, String>>,
    #[serde(rename = "wikiDataId")]
    wikidata_id: Option<String>,
}

// =============================================================================
// STORED RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Region {
    id: SerialUuid,
    code: String,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Kind {
    Unknown,
    Named { label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CityRecord {
    id: SerialUuid,
    name: String,
    native: Option<String>,
    kind: Kind,
    state: Region,
    country: Region,
    location: Option<Vec3d>,
    population: Option<i64>,
    timezone: Option<String>,
    translations: HashMap<String, String>,
    wikidata: Option<Identifier>,
}

const PREFIX_CITY: u8 = 0x01;
const PREFIX_STATE: u8 = 0x02;
const PREFIX_COUNTRY: u8 = 0x03;

fn make_id(prefix: u8, id: u32) -> SerialUuid {
    let mut bytes = [0u8; 16];
    bytes[0] = prefix;
    bytes[12..16].copy_from_slice(&id.to_be_bytes());
    // Version 8, RFC 4122 variant
    bytes[6] = (bytes[6] & 0x0F) | 0x80;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;
    SerialUuid(Uuid::from_bytes(bytes))
}

fn convert(city: City) -> CityRecord {
    let location = match (city.latitude.parse::<f64>(), city.longitude.parse::<f64>()) {
        (Ok(lat), Ok(lon)) => Some(Vec3d::new(lon, 0.0, lat)),
        _ => None,
    };
    let kind = match city.city_type {
        Some(label) => Kind::Named { label },
        None => Kind::Unknown,
    };
    let wikidata = city
        .wikidata_id
        .and_then(|id| Identifier::new("wikidata", id.to_ascii_lowercase()).ok());

    CityRecord {
        id: make_id(PREFIX_CITY, city.id),
        name: city.name,
        native: city.native.filter(|n| !n.is_empty()),
        kind,
        state: Region {
            id: make_id(PREFIX_STATE, city.state_id),
            code: city.state_code,
            name: city.state_name,
        },
        country: Region {
            id: make_id(PREFIX_COUNTRY, city.country_id),
            code: city.country_code,
            name: city.country_name,
        },
        location,
        population: city.population,
        timezone: city.timezone,
        translations: city.translations.unwrap_or_default(),
        wikidata,
    }
}

fn throughput(bytes: usize, seconds: f64) -> f64 {
    (bytes as f64 / 1_000_000.0) / seconds
}

/// Rough in-memory footprint of a node tree.
fn node_size(node: &Node) -> usize {
    match node {
        Node::End => 1,
        Node::Byte(_) => 1,
        Node::Short(_) => 2,
        Node::Int(_) | Node::Float(_) => 4,
        Node::Long(_) | Node::Double(_) => 8,
        Node::String(s) => 2 + s.len(),
        Node::ByteArray(v) => 4 + v.len(),
        Node::IntArray(v) => 4 + 4 * v.len(),
        Node::LongArray(v) => 4 + 8 * v.len(),
        Node::List(list) => 5 + list.iter().map(node_size).sum::<usize>(),
        Node::Compound(compound) => {
            1 + compound
                .iter()
                .map(|(key, node)| 3 + key.len() + node_size(node))
                .sum::<usize>()
        }
    }
}

fn main() {
    let data_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "../../../out/cities.json".to_string());

    println!("Loading cities from: {}", data_path);

    let json_data = fs::read_to_string(&data_path).expect("Failed to read cities.json");

    let parse_start = Instant::now();
    let cities: Vec<City> = serde_json::from_str(&json_data).expect("Failed to parse JSON");
    let parse_time = parse_start.elapsed();
    println!("Loaded {} cities in {:?}", cities.len(), parse_time);

    let records: Vec<CityRecord> = cities.into_iter().map(convert).collect();

    // Registered serial names for the enum variants.
    let module = SerializersModule::new()
        .polymorphic("Kind", "Named", "city:named")
        .polymorphic("Kind", "Unknown", "city:unknown");
    let nbt = drawer::Nbt::new(&module);

    // =========================================================================
    // TREE
    // =========================================================================

    let tree_start = Instant::now();
    let mut root = Compound::new();
    nbt.put(Some(&records), &mut root, Some("cities"))
        .expect("Failed to encode tree");
    let tree_time = tree_start.elapsed();
    let tree_size = root.get("cities").map(node_size).unwrap_or(0);
    println!("\nTree: ~{} bytes in {:?}", tree_size, tree_time);

    let tree_decode_start = Instant::now();
    let decoded: Vec<CityRecord> = nbt
        .get_from(&root, Some("cities"))
        .expect("Failed to decode tree");
    let tree_decode_time = tree_decode_start.elapsed();
    println!("  Decode: {:?}", tree_decode_time);
    assert_eq!(decoded, records, "tree round trip mismatch");

    // =========================================================================
    // FLAT
    // =========================================================================

    let flat_start = Instant::now();
    let flat = nbt.to_bytes(&records).expect("Failed to encode flat buffer");
    let flat_time = flat_start.elapsed();
    println!("\nFlat: {} bytes in {:?}", flat.len(), flat_time);
    println!(
        "  Throughput: {:.2} MB/s",
        throughput(flat.len(), flat_time.as_secs_f64())
    );

    let flat_decode_start = Instant::now();
    let decoded: Vec<CityRecord> = nbt.from_bytes(&flat).expect("Failed to decode flat buffer");
    let flat_decode_time = flat_decode_start.elapsed();
    println!("  Decode: {:?}", flat_decode_time);
    println!(
        "  Throughput: {:.2} MB/s",
        throughput(flat.len(), flat_decode_time.as_secs_f64())
    );
    assert_eq!(decoded, records, "flat round trip mismatch");

    // =========================================================================
    // JSON
    // =========================================================================

    let json_start = Instant::now();
    let json = serde_json::to_vec(&records).expect("Failed to encode JSON");
    let json_time = json_start.elapsed();
    println!("\nJSON: {} bytes in {:?}", json.len(), json_time);

    println!("\n=== Summary ===");
    println!("Source JSON:  {} bytes", json_data.len());
    println!(
        "Flat vs JSON: {:.1}% of the size",
        100.0 * flat.len() as f64 / json.len() as f64
    );
    println!(
        "Tree vs JSON: {:.1}% of the size",
        100.0 * tree_size as f64 / json.len() as f64
    );
}
