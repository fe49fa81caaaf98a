//! Keyed and indexed node containers.

use rustc_hash::FxHashMap;

use super::Node;

/// A string-keyed node container with unique keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: FxHashMap<String, Node>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, node: impl Into<Node>) -> Self {
        self.insert(key, node);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a node, returning the one previously stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), node.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn entries(&self) -> std::collections::hash_map::Iter<'_, String, Node> {
        self.entries.iter()
    }
}

impl FromIterator<(String, Node)> for Compound {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Compound {
    type Item = (String, Node);
    type IntoIter = std::collections::hash_map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// An index-addressed list of nodes.
///
/// [`put_at`](NodeList::put_at) writes at any index, growing the list with
/// `End` placeholders when the index lies past the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeList {
    slots: Vec<Node>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.slots.get(index)
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.slots.push(node.into());
    }

    /// Stores `node` at `index`, replacing what was there.
    pub fn put_at(&mut self, index: usize, node: impl Into<Node>) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, Node::End);
        }
        self.slots[index] = node.into();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.slots.iter()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.slots
    }

    pub fn into_vec(self) -> Vec<Node> {
        self.slots
    }
}

impl From<Vec<Node>> for NodeList {
    fn from(slots: Vec<Node>) -> Self {
        Self { slots }
    }
}

impl FromIterator<Node> for NodeList {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_basics() {
        let mut compound = Compound::new().with("a", 1).with("b", "two");
        assert_eq!(compound.len(), 2);
        assert!(compound.contains_key("a"));
        assert_eq!(compound.get("b"), Some(&Node::String("two".into())));

        assert_eq!(compound.insert("a", 5i64), Some(Node::Int(1)));
        assert_eq!(compound.remove("b"), Some(Node::String("two".into())));
        assert!(!compound.contains_key("b"));

        let keys: Vec<_> = compound.keys().collect();
        assert_eq!(keys, vec!["a"]);
    }

    #[test]
    fn test_put_at_grows_with_end() {
        let mut list = NodeList::new();
        list.put_at(2, 7);
        assert_eq!(list.as_slice(), &[Node::End, Node::End, Node::Int(7)]);

        list.put_at(0, 1);
        list.push(9);
        assert_eq!(list.len(), 4);
        assert_eq!(list.get(0), Some(&Node::Int(1)));
        assert_eq!(list.get(3), Some(&Node::Int(9)));
    }
}
