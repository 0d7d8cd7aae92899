//! Text forms of identifiers that need no world.

use std::fmt::Write;

use crate::layout::{
    self, ANY, AUTO_OVERRIDE, COMPONENT_MASK, ENTITY_MASK, PAIR, TOGGLE, WILDCARD,
};

/// Name of the most significant known flag in `flags`.
pub fn flag_str(flags: u64) -> &'static str {
    if layout::has_id_flag(flags, PAIR) {
        "PAIR"
    } else if layout::has_id_flag(flags, TOGGLE) {
        "TOGGLE"
    } else if layout::has_id_flag(flags, AUTO_OVERRIDE) {
        "AUTO_OVERRIDE"
    } else {
        "UNKNOWN"
    }
}

/// Path of an unnamed entity: `*` and `_` for the wildcards, `#index`
/// otherwise.
pub fn entity_path(entity: u64) -> String {
    match entity {
        WILDCARD => "*".to_owned(),
        ANY => "_".to_owned(),
        e => format!("#{}", e & ENTITY_MASK),
    }
}

/// Render `id` as `[TOGGLE|][AUTO_OVERRIDE|]path` or `(first,second)`,
/// using `path` for each entity.
pub fn id_str<F>(id: u64, mut path: F) -> String
where
    F: FnMut(u64) -> String,
{
    let mut out = String::new();
    if layout::has_id_flag(id, TOGGLE) {
        out.push_str("TOGGLE|");
    }
    if layout::has_id_flag(id, AUTO_OVERRIDE) {
        out.push_str("AUTO_OVERRIDE|");
    }

    if layout::has_id_flag(id, PAIR) {
        let first = path(layout::pair_first(id));
        let second = path(layout::pair_second(id));
        let _ = write!(out, "({},{})", first, second);
    } else {
        out.push_str(&path(id & COMPONENT_MASK));
    }
    out
}
