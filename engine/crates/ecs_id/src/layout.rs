//! Bit layout of a 64-bit identifier and the pure operations over it.
//!
//! ```text
//!  63      56 55                 32 31                   0
//! +----------+---------------------+---------------------+
//! |  flags   |  generation / first |  index / second     |
//! +----------+---------------------+---------------------+
//! ```
//!
//! A plain entity keeps its index in the low 32 bits and a 16-bit generation
//! in bits 32..48. A pair keeps its first part in bits 32..56 and its second
//! part in the low 32 bits, with [`PAIR`] set in the flags region.
//!
//! Every component that encodes or decodes identifiers must agree on these
//! constants bit for bit.

/// Top 8 bits, reserved for id flags.
pub const ID_FLAGS_MASK: u64 = 0xFF << 56;

/// Everything except the flags region.
pub const COMPONENT_MASK: u64 = !ID_FLAGS_MASK;

/// Entity index bits.
pub const ENTITY_MASK: u64 = 0xFFFF_FFFF;

/// Generation counter bits of a plain entity.
pub const GENERATION_MASK: u64 = 0xFFFF << 32;

/// Id is a (first, second) pair.
pub const PAIR: u64 = 1 << 63;

/// Id is automatically overridden when inherited.
pub const AUTO_OVERRIDE: u64 = 1 << 62;

/// Id can be toggled on and off without a table move.
pub const TOGGLE: u64 = 1 << 61;

/// Ids below this value are reserved for builtin components.
pub const HI_COMPONENT_ID: u64 = 256;

/// Matches any id, including multiple matches per entity.
pub const WILDCARD: u64 = HI_COMPONENT_ID + 10;

/// Matches any id, at most once per entity.
pub const ANY: u64 = HI_COMPONENT_ID + 11;

/// First index handed out for user entities by default.
pub const FIRST_USER_ENTITY_ID: u32 = (HI_COMPONENT_ID + 128) as u32;

/// Largest number of bits the first part of a pair can hold.
pub const PAIR_FIRST_BITS: u32 = 24;

/// Pack `first` and `second` into a pair id.
///
/// Generation bits of both parts are dropped, and bits of `first` above
/// [`PAIR_FIRST_BITS`] are masked off so the result never collides with
/// another flag region.
#[inline]
pub const fn pair(first: u64, second: u64) -> u64 {
    PAIR | ((((first as u32) as u64) << 32) & COMPONENT_MASK) | ((second as u32) as u64)
}

/// First part of a pair id.
#[inline]
pub const fn pair_first(id: u64) -> u64 {
    ((id & COMPONENT_MASK) >> 32) as u32 as u64
}

/// Second part of a pair id.
#[inline]
pub const fn pair_second(id: u64) -> u64 {
    id as u32 as u64
}

#[inline]
pub const fn is_pair(id: u64) -> bool {
    (id & ID_FLAGS_MASK) == PAIR
}

#[inline]
pub const fn has_id_flag(id: u64, flag: u64) -> bool {
    (id & flag) != 0
}

/// Generation counter of a plain entity handle.
#[inline]
pub const fn generation(entity: u64) -> u32 {
    ((entity & GENERATION_MASK) >> 32) as u32
}

/// Same handle with its generation incremented, wrapping at 16 bits.
#[inline]
pub const fn generation_inc(entity: u64) -> u64 {
    let next = (generation(entity) as u64 + 1) & 0xFFFF;
    (entity & !GENERATION_MASK) | (next << 32)
}

/// Handle for `index` stamped with `generation`.
#[inline]
pub const fn stamp(index: u32, generation: u32) -> u64 {
    (((generation as u64) << 32) & GENERATION_MASK) | index as u64
}

/// True when `id` is one of the wildcard sentinels, or a pair with a
/// wildcard on either side.
///
/// This is the single definition of "wildcard" used by every id type.
#[inline]
pub const fn id_is_wildcard(id: u64) -> bool {
    if id == WILDCARD || id == ANY {
        return true;
    }
    if !is_pair(id) {
        return false;
    }
    let first = pair_first(id);
    let second = pair_second(id);
    first == WILDCARD || second == WILDCARD || first == ANY || second == ANY
}
