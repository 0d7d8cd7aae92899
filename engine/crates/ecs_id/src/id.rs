use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entity::Entity;
use crate::layout::{self, COMPONENT_MASK, ENTITY_MASK, ID_FLAGS_MASK, PAIR};
use crate::render;
use crate::world::WorldContext;

/// A 64-bit identifier: an entity, component, tag, pair or wildcard.
///
/// The optional world is a borrowed back-reference used by [`Id::first`],
/// [`Id::second`], [`Id::type_id`] and the renderers. It is not part of the
/// identity: equality, ordering and hashing only look at the raw value, and
/// converting to `u64` or serializing drops it.
#[derive(Clone, Copy, Default)]
pub struct Id<'w> {
    raw: u64,
    world: Option<&'w dyn WorldContext>,
}

impl<'w> Id<'w> {
    pub const fn from_raw(raw: u64) -> Self {
        Self { raw, world: None }
    }

    pub fn from_world(world: &'w dyn WorldContext, raw: u64) -> Self {
        Self {
            raw,
            world: Some(world),
        }
    }

    /// The null id, bound to `world`.
    pub fn null_in(world: &'w dyn WorldContext) -> Self {
        Self::from_world(world, 0)
    }

    pub const fn pair(first: u64, second: u64) -> Self {
        Self::from_raw(layout::pair(first, second))
    }

    pub fn pair_in(world: &'w dyn WorldContext, first: u64, second: u64) -> Self {
        Self::from_world(world, layout::pair(first, second))
    }

    /// Pair of two ids; the world comes from `first`.
    pub fn from_ids(first: Id<'w>, second: Id<'_>) -> Self {
        Self {
            raw: layout::pair(first.raw, second.raw),
            world: first.world,
        }
    }

    /// Pair of two entities; the world comes from `first`.
    pub fn from_entities(first: Entity<'w>, second: Entity<'_>) -> Self {
        Self {
            raw: layout::pair(first.raw(), second.raw()),
            world: first.world(),
        }
    }

    pub(crate) fn with_world(world: Option<&'w dyn WorldContext>, raw: u64) -> Self {
        Self { raw, world }
    }

    #[inline]
    pub const fn to_raw(self) -> u64 {
        self.raw
    }

    #[inline]
    pub fn world(self) -> Option<&'w dyn WorldContext> {
        self.world
    }

    pub fn set_raw(&mut self, raw: u64) {
        self.raw = raw;
    }

    pub fn set_world(&mut self, world: Option<&'w dyn WorldContext>) {
        self.world = world;
    }

    #[inline]
    pub const fn is_pair(self) -> bool {
        (self.raw & ID_FLAGS_MASK) == PAIR
    }

    #[inline]
    pub const fn is_wildcard(self) -> bool {
        layout::id_is_wildcard(self.raw)
    }

    #[inline]
    pub const fn is_entity(self) -> bool {
        (self.raw & ID_FLAGS_MASK) == 0
    }

    /// The id as a plain entity.
    ///
    /// # Panics
    ///
    /// If the id is a pair or carries flags.
    pub fn entity(self) -> Entity<'w> {
        assert!(!self.is_pair(), "Id::entity called on pair {:#x}", self.raw);
        assert!(
            !self.has_any_flags(),
            "Id::entity called on flagged id {:#x}",
            self.raw
        );
        self.to_entity(self.raw)
    }

    pub fn add_flags(self, flags: u64) -> Entity<'w> {
        self.to_entity(self.raw | flags)
    }

    /// Clear the flags region, which must hold exactly `flags`.
    ///
    /// # Panics
    ///
    /// If the flags region is not exactly `flags`.
    pub fn remove_flags(self, flags: u64) -> Entity<'w> {
        assert!(
            (self.raw & ID_FLAGS_MASK) == flags,
            "Id::remove_flags: id {:#x} does not carry exactly flags {:#x}",
            self.raw,
            flags
        );
        self.to_entity(self.raw & COMPONENT_MASK)
    }

    /// Clear the flags region, whatever it holds.
    pub fn strip_flags(self) -> Entity<'w> {
        self.to_entity(self.raw & COMPONENT_MASK)
    }

    /// Keep only the low 32 bits, dropping generation and flags.
    pub fn remove_generation(self) -> Entity<'w> {
        self.to_entity(self.raw & ENTITY_MASK)
    }

    /// Component type that stores data for this id, as resolved by the world.
    ///
    /// # Panics
    ///
    /// If no world is bound.
    pub fn type_id(self) -> Entity<'w> {
        let world = self.world.unwrap_or_else(|| {
            panic!("Id::type_id requires a world, id {:#x} is unbound", self.raw)
        });
        Entity::new(world, world.resolve_component_type(self.raw))
    }

    #[inline]
    pub const fn has_flags(self, flags: u64) -> bool {
        (self.raw & flags) == flags
    }

    #[inline]
    pub const fn has_any_flags(self) -> bool {
        (self.raw & ID_FLAGS_MASK) != 0
    }

    pub fn flags(self) -> Entity<'w> {
        self.to_entity(self.raw & ID_FLAGS_MASK)
    }

    pub fn has_relation(self, first: u64) -> bool {
        self.is_pair() && layout::pair_first(self.raw) == first
    }

    /// First part of the pair. With a world bound the handle is resolved to
    /// its live generation.
    ///
    /// # Panics
    ///
    /// If the id is not a pair.
    pub fn first(self) -> Entity<'w> {
        assert!(
            self.is_pair(),
            "Id::first called on non-pair {:#x}",
            self.raw
        );
        self.resolve(layout::pair_first(self.raw))
    }

    /// Second part of the pair, resolved the same way as [`Id::first`].
    ///
    /// # Panics
    ///
    /// If the id is not a pair.
    pub fn second(self) -> Entity<'w> {
        assert!(
            self.is_pair(),
            "Id::second called on non-pair {:#x}",
            self.raw
        );
        self.resolve(layout::pair_second(self.raw))
    }

    pub fn str(self) -> String {
        match self.world {
            Some(world) => world.render_id(self.raw),
            None => render::id_str(self.raw, render::entity_path),
        }
    }

    pub fn flags_str(self) -> String {
        let flags = self.raw & ID_FLAGS_MASK;
        match self.world {
            Some(world) => world.render_flags(flags),
            None => render::flag_str(flags).to_owned(),
        }
    }

    fn resolve(self, entity: u64) -> Entity<'w> {
        match self.world {
            Some(world) => Entity::new(world, world.resolve_alive(entity)),
            None => Entity::from_raw(entity),
        }
    }

    fn to_entity(self, raw: u64) -> Entity<'w> {
        Entity::with_world(self.world, raw)
    }
}

impl PartialEq for Id<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Id<'_> {}

impl Hash for Id<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for Id<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Id<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl From<u64> for Id<'_> {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<Id<'_>> for u64 {
    fn from(id: Id<'_>) -> Self {
        id.raw
    }
}

impl fmt::Debug for Id<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Id")
            .field("raw", &format_args!("{:#018x}", self.raw))
            .field("bound", &self.world.is_some())
            .finish()
    }
}

impl fmt::Display for Id<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.str())
    }
}

impl Serialize for Id<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.raw)
    }
}

impl<'de> Deserialize<'de> for Id<'_> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::from_raw)
    }
}
