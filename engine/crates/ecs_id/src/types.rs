use serde::{Deserialize, Serialize};

use crate::layout::{self, ENTITY_MASK};

/// Decomposed plain entity handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

impl EntityId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Generation is truncated to the 16 bits the layout reserves for it.
    pub fn to_u64(self) -> u64 {
        layout::stamp(self.index, self.generation)
    }

    /// Flag bits of `val` are ignored.
    pub fn from_u64(val: u64) -> Self {
        Self {
            index: (val & ENTITY_MASK) as u32,
            generation: layout::generation(val),
        }
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "E({}v{})", self.index, self.generation)
    }
}
