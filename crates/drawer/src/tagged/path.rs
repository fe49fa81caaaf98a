//! Tag paths: the dotted address of the element being visited.

use thiserror::Error;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Joins a child element name onto a parent path.
///
/// The root path is empty, so its children are addressed by bare name.
#[inline]
pub fn compose(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_owned()
    } else {
        let mut path = String::with_capacity(parent.len() + 1 + child.len());
        path.push_str(parent);
        path.push(PATH_SEPARATOR);
        path.push_str(child);
        path
    }
}

/// Popped a tag off an empty [`TagStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tag stack popped while empty")]
pub struct TagStackUnderflow;

/// Stack of composed tags, one frame per element being visited.
///
/// Its depth always equals the current nesting depth.
#[derive(Debug, Clone, Default)]
pub struct TagStack {
    tags: Vec<String>,
}

impl TagStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag of the element currently being visited.
    pub fn current(&self) -> Option<&str> {
        self.tags.last().map(String::as_str)
    }

    /// Like [`current`](Self::current), with the root as the empty path.
    pub fn current_path(&self) -> &str {
        self.current().unwrap_or("")
    }

    pub fn depth(&self) -> usize {
        self.tags.len()
    }

    /// Enters the element `child` of the current element.
    pub fn push_child(&mut self, child: &str) {
        let tag = compose(self.current_path(), child);
        tracing::trace!(tag = %tag, "enter");
        self.tags.push(tag);
    }

    /// Enters the positional element `index` of the current element.
    pub fn push_index(&mut self, index: usize) {
        self.push_child(&index.to_string());
    }

    /// Leaves the current element, returning its tag.
    pub fn pop(&mut self) -> Result<String, TagStackUnderflow> {
        self.tags.pop().ok_or(TagStackUnderflow)
    }
}
