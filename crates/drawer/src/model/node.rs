//! The physical tree data model.

use std::fmt;

use super::{Compound, NodeList};

/// Physical node kinds, numbered by their NBT tag ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeKind {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl NodeKind {
    /// All kinds in tag id order.
    pub const ALL: [NodeKind; 13] = [
        NodeKind::End,
        NodeKind::Byte,
        NodeKind::Short,
        NodeKind::Int,
        NodeKind::Long,
        NodeKind::Float,
        NodeKind::Double,
        NodeKind::ByteArray,
        NodeKind::String,
        NodeKind::List,
        NodeKind::Compound,
        NodeKind::IntArray,
        NodeKind::LongArray,
    ];

    /// Returns the kind with the given tag id.
    pub fn from_id(id: u8) -> Option<NodeKind> {
        Self::ALL.get(id as usize).copied()
    }

    /// Returns the NBT tag id.
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::End => "End",
            NodeKind::Byte => "Byte",
            NodeKind::Short => "Short",
            NodeKind::Int => "Int",
            NodeKind::Long => "Long",
            NodeKind::Float => "Float",
            NodeKind::Double => "Double",
            NodeKind::ByteArray => "ByteArray",
            NodeKind::String => "String",
            NodeKind::List => "List",
            NodeKind::Compound => "Compound",
            NodeKind::IntArray => "IntArray",
            NodeKind::LongArray => "LongArray",
        }
    }

    /// Returns true for single-value kinds that can be stringified as a compound key.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            NodeKind::Byte
                | NodeKind::Short
                | NodeKind::Int
                | NodeKind::Long
                | NodeKind::Float
                | NodeKind::Double
                | NodeKind::String
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_primitive() && self != NodeKind::String
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single node of the tree format.
///
/// `End` doubles as the null sentinel: it is what a `None` field is stored as
/// and what a `None` document encodes to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(NodeList),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// The null sentinel.
pub static NULL: Node = Node::End;

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::End => NodeKind::End,
            Node::Byte(_) => NodeKind::Byte,
            Node::Short(_) => NodeKind::Short,
            Node::Int(_) => NodeKind::Int,
            Node::Long(_) => NodeKind::Long,
            Node::Float(_) => NodeKind::Float,
            Node::Double(_) => NodeKind::Double,
            Node::ByteArray(_) => NodeKind::ByteArray,
            Node::String(_) => NodeKind::String,
            Node::List(_) => NodeKind::List,
            Node::Compound(_) => NodeKind::Compound,
            Node::IntArray(_) => NodeKind::IntArray,
            Node::LongArray(_) => NodeKind::LongArray,
        }
    }

    /// Returns true if this node is the null sentinel.
    pub fn is_null(&self) -> bool {
        matches!(self, Node::End)
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Node::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Node::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&NodeList> {
        match self {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns any integral node widened to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Node::Byte(v) => Some(v as i64),
            Node::Short(v) => Some(v as i64),
            Node::Int(v) => Some(v as i64),
            Node::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Returns any numeric node widened to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Node::Float(v) => Some(v as f64),
            Node::Double(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    /// Renders a primitive node as a compound key.
    ///
    /// Returns `None` for kinds that cannot stringify unambiguously.
    pub fn to_key_string(&self) -> Option<String> {
        match self {
            Node::Byte(v) => Some(v.to_string()),
            Node::Short(v) => Some(v.to_string()),
            Node::Int(v) => Some(v.to_string()),
            Node::Long(v) => Some(v.to_string()),
            Node::Float(v) => Some(v.to_string()),
            Node::Double(v) => Some(v.to_string()),
            Node::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(v: $ty) -> Self {
                    Node::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Compound => Compound,
    NodeList => List,
}

impl From<bool> for Node {
    fn from(v: bool) -> Self {
        Node::Byte(v as i8)
    }
}

impl From<&str> for Node {
    fn from(v: &str) -> Self {
        Node::String(v.to_owned())
    }
}

// =============================================================================
// TEXT RENDERING
// =============================================================================

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

pub(crate) fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            _ => fmt::Write::write_char(f, c)?,
        }
    }
    f.write_str("\"")
}

fn write_array<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    suffix: &str,
    items: &[T],
) -> fmt::Result {
    write!(f, "[{prefix};")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}{suffix}")?;
    }
    f.write_str("]")
}

/// Stringified NBT: `{name:"x",count:3b,pos:[I;1,2,3]}`.
///
/// Compound keys are sorted so the output is stable.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::End => f.write_str("END"),
            Node::Byte(v) => write!(f, "{v}b"),
            Node::Short(v) => write!(f, "{v}s"),
            Node::Int(v) => write!(f, "{v}"),
            Node::Long(v) => write!(f, "{v}L"),
            Node::Float(v) => write!(f, "{v}f"),
            Node::Double(v) => write!(f, "{v}d"),
            Node::String(s) => write_quoted(f, s),
            Node::ByteArray(v) => write_array(f, "B", "b", v),
            Node::IntArray(v) => write_array(f, "I", "", v),
            Node::LongArray(v) => write_array(f, "L", "L", v),
            Node::List(list) => {
                f.write_str("[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Node::Compound(compound) => {
                let mut entries: Vec<_> = compound.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                f.write_str("{")?;
                for (i, (key, value)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if is_bare_key(key) {
                        f.write_str(key)?;
                    } else {
                        write_quoted(f, key)?;
                    }
                    write!(f, ":{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}
