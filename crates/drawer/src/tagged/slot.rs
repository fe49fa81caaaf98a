//! Single-value slot for values with no enclosing key.

use thiserror::Error;

/// Misuse of a [`PrimitiveSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotMisuse {
    #[error("primitive slot already recorded a value")]
    AlreadyRecorded,
    #[error("primitive slot finished without a value")]
    NeverRecorded,
}

/// Holds the one node produced at a position that has no key to store it
/// under: the document root, or a map key.
#[derive(Debug)]
pub struct PrimitiveSlot<T> {
    content: Option<T>,
}

impl<T> Default for PrimitiveSlot<T> {
    fn default() -> Self {
        Self { content: None }
    }
}

impl<T> PrimitiveSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, value: T) -> Result<(), SlotMisuse> {
        if self.content.is_some() {
            return Err(SlotMisuse::AlreadyRecorded);
        }
        self.content = Some(value);
        Ok(())
    }

    pub fn is_recorded(&self) -> bool {
        self.content.is_some()
    }

    pub fn finish(self) -> Result<T, SlotMisuse> {
        self.content.ok_or(SlotMisuse::NeverRecorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_once() {
        let mut slot = PrimitiveSlot::new();
        slot.record(3).unwrap();
        assert!(slot.is_recorded());
        assert_eq!(slot.record(4), Err(SlotMisuse::AlreadyRecorded));
        assert_eq!(slot.finish(), Ok(3));
    }

    #[test]
    fn test_finish_empty() {
        let slot: PrimitiveSlot<i32> = PrimitiveSlot::new();
        assert_eq!(slot.finish(), Err(SlotMisuse::NeverRecorded));
    }
}
