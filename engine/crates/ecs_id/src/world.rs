use crate::render;

/// Queries an identifier needs from the world that owns it.
///
/// Implementations own entity liveness and component metadata. None of the
/// methods mutate the world. Identifiers call through this trait without
/// locking or caching anything, so any synchronization is up to the
/// implementation.
pub trait WorldContext: Sync {
    /// Current generation-stamped handle for the entity index in `entity`.
    ///
    /// What is returned for an index the world has no record of is up to the
    /// implementation.
    fn resolve_alive(&self, entity: u64) -> u64;

    /// Id of the component type that stores the data for `id`, or `0`.
    fn resolve_component_type(&self, id: u64) -> u64;

    /// Canonical textual form of `id`. The default knows no names and
    /// renders entities by number.
    fn render_id(&self, id: u64) -> String {
        render::id_str(id, render::entity_path)
    }

    /// Textual form of a flags-only value.
    fn render_flags(&self, flags: u64) -> String {
        render::flag_str(flags).to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{pair, ANY, TOGGLE, WILDCARD};

    /// Only the required queries.
    struct Unnamed;

    impl WorldContext for Unnamed {
        fn resolve_alive(&self, entity: u64) -> u64 {
            entity
        }

        fn resolve_component_type(&self, _id: u64) -> u64 {
            0
        }
    }

    #[test]
    fn default_render_id_is_numeric() {
        let world = Unnamed;
        assert_eq!(world.render_id(600), "#600");
        assert_eq!(world.render_id(pair(5, 9)), "(#5,#9)");
        assert_eq!(world.render_id(pair(WILDCARD, ANY)), "(*,_)");
        assert_eq!(world.render_id(600 | TOGGLE), "TOGGLE|#600");
    }

    #[test]
    fn default_render_flags_uses_flag_names() {
        let world = Unnamed;
        assert_eq!(world.render_flags(TOGGLE), "TOGGLE");
        assert_eq!(world.render_flags(0), "UNKNOWN");
    }
}
