use std::fmt;
use std::hash::{Hash, Hasher};

use crate::id::Id;
use crate::layout::{self, ENTITY_MASK};
use crate::types::EntityId;
use crate::world::WorldContext;

/// A plain entity handle, optionally bound to the world it lives in.
///
/// Like [`Id`], identity is the raw value alone.
#[derive(Clone, Copy, Default)]
pub struct Entity<'w> {
    raw: u64,
    world: Option<&'w dyn WorldContext>,
}

impl<'w> Entity<'w> {
    pub const fn from_raw(raw: u64) -> Self {
        Self { raw, world: None }
    }

    pub fn new(world: &'w dyn WorldContext, raw: u64) -> Self {
        Self {
            raw,
            world: Some(world),
        }
    }

    pub(crate) fn with_world(world: Option<&'w dyn WorldContext>, raw: u64) -> Self {
        Self { raw, world }
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.raw
    }

    #[inline]
    pub fn world(self) -> Option<&'w dyn WorldContext> {
        self.world
    }

    pub fn id(self) -> Id<'w> {
        Id::with_world(self.world, self.raw)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        (self.raw & ENTITY_MASK) as u32
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        layout::generation(self.raw)
    }

    pub fn entity_id(self) -> EntityId {
        EntityId::from_u64(self.raw)
    }

    /// With a world bound, true when the world's current handle for this
    /// index is exactly this handle. Without one, any nonzero handle counts.
    pub fn is_alive(self) -> bool {
        match self.world {
            Some(world) => self.raw != 0 && world.resolve_alive(self.raw & ENTITY_MASK) == self.raw,
            None => self.raw != 0,
        }
    }
}

impl PartialEq for Entity<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Entity<'_> {}

impl Hash for Entity<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for Entity<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entity<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl From<u64> for Entity<'_> {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<Entity<'_>> for u64 {
    fn from(entity: Entity<'_>) -> Self {
        entity.raw
    }
}

impl<'w> From<Entity<'w>> for Id<'w> {
    fn from(entity: Entity<'w>) -> Self {
        entity.id()
    }
}

impl fmt::Debug for Entity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("raw", &format_args!("{:#018x}", self.raw))
            .field("bound", &self.world.is_some())
            .finish()
    }
}

impl fmt::Display for Entity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id().str())
    }
}
