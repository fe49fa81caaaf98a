//! Structure kinds and how the physical data selects them.

use std::borrow::Cow;

use crate::model::NodeKind;
use crate::schema::ElementKind;

/// Physical layout of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    /// One compound entry per map entry, keyed by the stringified key.
    Compound,
    /// A list alternating key, value, key, value.
    PairList,
}

impl MapMode {
    /// Layout for a map whose keys encode to `key` nodes.
    ///
    /// Returns `None` for the null sentinel, which can never be a key.
    pub fn for_key(key: NodeKind) -> Option<MapMode> {
        match key {
            NodeKind::End => None,
            k if k.is_primitive() => Some(MapMode::Compound),
            _ => Some(MapMode::PairList),
        }
    }

    /// Layout an encoded map node was written with.
    pub fn of_node(node: NodeKind) -> Option<MapMode> {
        match node {
            NodeKind::Compound => Some(MapMode::Compound),
            NodeKind::List => Some(MapMode::PairList),
            _ => None,
        }
    }
}

/// The codec that handles one nested structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    /// Named fields.
    Class,
    /// Positional elements.
    List,
    /// Positional elements that may be null, stored keyed by index.
    NullableList,
    Map(MapMode),
    /// A sum-type value carrying its variant name under the discriminator.
    Polymorphic,
    /// A single value with no enclosing structure.
    Primitive,
}

impl StructureKind {
    /// Chooses the decoding structure for a requested shape from the physical
    /// kind of the node at hand.
    ///
    /// Map layout and nullable lists are choices the encoder made from the
    /// data, so the node decides them, not the schema.
    pub fn select(requested: ElementKind, physical: NodeKind) -> Option<StructureKind> {
        use NodeKind as N;
        match (requested, physical) {
            (ElementKind::Class, N::Compound) => Some(StructureKind::Class),
            (ElementKind::Class, N::List) => Some(StructureKind::List),
            (ElementKind::List, N::List | N::ByteArray | N::IntArray | N::LongArray) => {
                Some(StructureKind::List)
            }
            (ElementKind::List, N::Compound) => Some(StructureKind::NullableList),
            (ElementKind::Map, n) => MapMode::of_node(n).map(StructureKind::Map),
            (ElementKind::Enum, N::Compound) => Some(StructureKind::Polymorphic),
            (ElementKind::Enum | ElementKind::Primitive, n) if n.is_primitive() => {
                Some(StructureKind::Primitive)
            }
            (ElementKind::Any, N::Compound) => Some(StructureKind::Map(MapMode::Compound)),
            (ElementKind::Any, N::List | N::ByteArray | N::IntArray | N::LongArray) => {
                Some(StructureKind::List)
            }
            (ElementKind::Any, _) => Some(StructureKind::Primitive),
            _ => None,
        }
    }

    /// Tag segment for the element at `index` declared as `declared`.
    ///
    /// Only classes address elements by name; every other structure uses the
    /// position.
    pub fn element_tag<'a>(&self, declared: &'a str, index: usize) -> Cow<'a, str> {
        match self {
            StructureKind::Class => Cow::Borrowed(declared),
            _ => Cow::Owned(index.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_mode_from_key() {
        assert_eq!(MapMode::for_key(NodeKind::Int), Some(MapMode::Compound));
        assert_eq!(MapMode::for_key(NodeKind::String), Some(MapMode::Compound));
        assert_eq!(MapMode::for_key(NodeKind::Compound), Some(MapMode::PairList));
        assert_eq!(MapMode::for_key(NodeKind::IntArray), Some(MapMode::PairList));
        assert_eq!(MapMode::for_key(NodeKind::End), None);
    }

    #[test]
    fn test_select_uses_physical_kind() {
        assert_eq!(
            StructureKind::select(ElementKind::List, NodeKind::Compound),
            Some(StructureKind::NullableList)
        );
        assert_eq!(
            StructureKind::select(ElementKind::Map, NodeKind::List),
            Some(StructureKind::Map(MapMode::PairList))
        );
        assert_eq!(
            StructureKind::select(ElementKind::Enum, NodeKind::Compound),
            Some(StructureKind::Polymorphic)
        );
        assert_eq!(
            StructureKind::select(ElementKind::Enum, NodeKind::Int),
            Some(StructureKind::Primitive)
        );
        assert_eq!(StructureKind::select(ElementKind::Class, NodeKind::Int), None);
        assert_eq!(StructureKind::select(ElementKind::Map, NodeKind::String), None);
    }

    #[test]
    fn test_element_tags() {
        assert_eq!(StructureKind::Class.element_tag("name", 1), "name");
        assert_eq!(StructureKind::List.element_tag("name", 1), "1");
        assert_eq!(StructureKind::Map(MapMode::Compound).element_tag("", 3), "3");
    }
}
