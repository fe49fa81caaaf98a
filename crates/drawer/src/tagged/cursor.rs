//! Decode-position cursor over declared elements.

/// Walks a structure's declared element names in order, yielding only the
/// ones present in the physical data.
///
/// Skipped elements are never visited, so the schema's own default applies.
#[derive(Debug, Clone)]
pub struct ElementCursor<'s> {
    names: &'s [&'static str],
    position: usize,
}

impl<'s> ElementCursor<'s> {
    pub fn new(names: &'s [&'static str]) -> Self {
        Self { names, position: 0 }
    }

    /// Advances to the next declared element for which `present` holds.
    ///
    /// Returns `None` once every declared position has been passed.
    pub fn next_present(&mut self, mut present: impl FnMut(&str) -> bool) -> Option<usize> {
        while self.position < self.names.len() {
            let index = self.position;
            self.position += 1;
            let name = self.names[index];
            if present(name) {
                return Some(index);
            }
            tracing::debug!(element = name, "absent from input, leaving it to its default");
        }
        None
    }

    /// Name of a declared element.
    pub fn name(&self, index: usize) -> &'static str {
        self.names[index]
    }

    /// Declared elements not yet passed.
    pub fn remaining(&self) -> usize {
        self.names.len() - self.position
    }
}
