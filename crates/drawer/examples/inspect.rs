//! Dumps a JSON document as a drawer node tree.

use std::fs;

use drawer::{Node, NodeKind};

fn preview(text: &str) -> String {
    let shown: String = text.chars().take(60).collect();
    if text.chars().count() > 60 {
        format!("\"{}...\"", shown)
    } else {
        format!("\"{}\"", shown)
    }
}

fn print_node(label: &str, node: &Node, depth: usize, budget: &mut usize) {
    if *budget == 0 {
        return;
    }
    *budget -= 1;

    let indent = "  ".repeat(depth);
    match node {
        Node::Compound(compound) => {
            println!("{}{}: {} ({} entries)", indent, label, NodeKind::Compound, compound.len());
            for (key, child) in compound.iter() {
                print_node(key, child, depth + 1, budget);
            }
        }
        Node::List(list) => {
            println!("{}{}: {} ({} elements)", indent, label, NodeKind::List, list.len());
            for (i, child) in list.iter().enumerate() {
                print_node(&format!("[{}]", i), child, depth + 1, budget);
            }
        }
        Node::String(text) => println!("{}{}: {}", indent, label, preview(text)),
        other => println!("{}{}: {} = {}", indent, label, other.kind(), other),
    }
}

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "../../data/sample.json".to_string());
    let limit: usize = std::env::args()
        .nth(2)
        .and_then(|n| n.parse().ok())
        .unwrap_or(200);

    println!("Reading: {}", path);

    let data = fs::read_to_string(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let value: serde_json::Value = serde_json::from_str(&data).expect("Failed to parse JSON");

    let node = drawer::to_node(&value).expect("Failed to encode tree");
    let flat = drawer::to_bytes(&value).expect("Failed to encode flat buffer");

    println!("\n=== Sizes ===");
    println!("  JSON: {} bytes", data.len());
    println!("  Flat: {} bytes", flat.len());

    println!("\n=== Tree (first {} nodes) ===", limit);
    let mut budget = limit;
    print_node("root", &node, 0, &mut budget);
    if budget == 0 {
        println!("  ... truncated");
    }
}
