/// Integration test: ids bound to an EntityRegistry resolve liveness, types and names.
use std::collections::HashSet;

use ecs_id::layout;
use ecs_id::{
    Entity, EntityRegistry, Id, RegistryConfig, WorldContext, AUTO_OVERRIDE, COMPONENT_MASK,
    ENTITY_MASK, TOGGLE, WILDCARD,
};

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Registry with one recycled entity so handles carry generation bits.
fn registry_with_recycled() -> (EntityRegistry, u64) {
    let mut reg = EntityRegistry::new();
    let first = reg.spawn().unwrap();
    reg.despawn(first).unwrap();
    let recycled = reg.spawn().unwrap();
    assert_eq!(layout::generation(recycled), 1);
    (reg, recycled)
}

#[test]
fn pair_parts_regain_generation_from_world() {
    init_logging();
    let (mut reg, likes) = registry_with_recycled();
    let bob = reg.spawn().unwrap();

    let p = Id::pair_in(&reg, likes, bob);
    // Packing drops generation bits.
    assert_eq!(layout::pair_first(p.to_raw()), likes & ENTITY_MASK);

    assert_eq!(p.first().raw(), likes);
    assert_eq!(p.second().raw(), bob);
    assert!(p.first().is_alive());

    let unbound = Id::pair(likes, bob);
    assert_eq!(unbound.first().raw(), likes & ENTITY_MASK);
    assert_eq!(unbound, p);
}

#[test]
fn dead_pair_part_resolves_to_zero() {
    let mut reg = EntityRegistry::new();
    let likes = reg.spawn().unwrap();
    let bob = reg.spawn().unwrap();
    reg.despawn(bob).unwrap();

    let p = Id::pair_in(&reg, likes, bob);
    assert_eq!(p.second().raw(), 0);
    assert!(!p.second().is_alive());
}

#[test]
fn wildcard_pairs_resolve_to_the_sentinel() {
    let mut reg = EntityRegistry::new();
    let likes = reg.spawn().unwrap();

    let p = Id::pair_in(&reg, likes, WILDCARD);
    assert!(p.is_wildcard());
    assert_eq!(p.second().raw(), WILDCARD);
    assert_eq!(p.second().id(), Id::from_raw(WILDCARD));
}

#[test]
fn type_id_through_registry() {
    let mut reg = EntityRegistry::new();
    let position = reg.spawn().unwrap();
    let likes = reg.spawn().unwrap();
    let bob = reg.spawn().unwrap();
    reg.register_component(position, 12).unwrap();
    reg.register_component(likes, 0).unwrap();

    assert_eq!(Id::from_world(&reg, position).type_id().raw(), position);
    assert_eq!(Id::pair_in(&reg, likes, position).type_id().raw(), position);
    assert_eq!(Id::pair_in(&reg, likes, bob).type_id().raw(), 0);
    assert!(Id::from_world(&reg, bob).type_id().world().is_some());
}

#[test]
fn rendering_through_registry() {
    let mut reg = EntityRegistry::new();
    let likes = reg.spawn().unwrap();
    let apples = reg.spawn().unwrap();
    reg.set_name(likes, "Likes").unwrap();
    reg.set_name(apples, "Apples").unwrap();

    let p = Id::pair_in(&reg, likes, apples);
    assert_eq!(p.str(), "(Likes,Apples)");
    assert_eq!(p.to_string(), "(Likes,Apples)");
    assert_eq!(p.flags_str(), "PAIR");

    let toggled = Id::from_world(&reg, likes).add_flags(TOGGLE);
    assert_eq!(toggled.to_string(), "TOGGLE|Likes");
    assert_eq!(toggled.id().flags_str(), "TOGGLE");

    // Without the registry only numbers are available.
    let unbound = Id::pair(likes, apples);
    assert_eq!(
        unbound.str(),
        format!("(#{},#{})", likes & ENTITY_MASK, apples & ENTITY_MASK)
    );
}

#[test]
fn flag_operations_keep_the_world() {
    let mut reg = EntityRegistry::new();
    let e = reg.spawn().unwrap();

    let id = Id::from_world(&reg, e);
    let flagged = id.add_flags(AUTO_OVERRIDE);
    assert!(flagged.world().is_some());
    assert!(flagged.id().has_flags(AUTO_OVERRIDE));
    assert_eq!(flagged.id().flags().raw(), AUTO_OVERRIDE);

    let restored = flagged.id().remove_flags(AUTO_OVERRIDE);
    assert_eq!(restored.raw(), e & COMPONENT_MASK);
    assert!(restored.world().is_some());
    assert!(restored.is_alive());
}

#[test]
fn entity_pairs_take_world_from_first() {
    let mut reg = EntityRegistry::new();
    let likes = reg.spawn().unwrap();
    let bob = reg.spawn().unwrap();

    let p = Id::from_entities(Entity::new(&reg, likes), Entity::from_raw(bob));
    assert!(p.world().is_some());
    assert!(p.has_relation(likes));
    assert_eq!(p.second().raw(), bob);
}

#[test]
fn ids_key_hash_sets_regardless_of_world() {
    let mut reg = EntityRegistry::new();
    let e = reg.spawn().unwrap();

    let mut set = HashSet::new();
    set.insert(Id::from_world(&reg, e));
    assert!(set.contains(&Id::from_raw(e)));
    assert!(!set.insert(Id::from_raw(e)));
}

#[test]
fn ids_serialize_as_bare_raw_values() {
    let mut reg = EntityRegistry::new();
    let likes = reg.spawn().unwrap();
    let bob = reg.spawn().unwrap();

    let ids = vec![Id::from_world(&reg, likes), Id::pair_in(&reg, likes, bob)];
    let bytes = bincode::serialize(&ids).unwrap();
    let raws = vec![ids[0].to_raw(), ids[1].to_raw()];
    assert_eq!(bytes, bincode::serialize(&raws).unwrap());

    let restored: Vec<Id<'static>> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored, ids);
    assert!(restored.iter().all(|id| id.world().is_none()));
}

#[test]
fn bound_ids_are_usable_across_threads() {
    let mut reg = EntityRegistry::new();
    let likes = reg.spawn().unwrap();
    let bobs: Vec<u64> = (0..8).map(|_| reg.spawn().unwrap()).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = bobs
            .iter()
            .map(|&bob| {
                let p = Id::pair_in(&reg, likes, bob);
                scope.spawn(move || (p.first().raw(), p.second().raw()))
            })
            .collect();
        for (handle, &bob) in handles.into_iter().zip(&bobs) {
            assert_eq!(handle.join().unwrap(), (likes, bob));
        }
    });
}

#[test]
fn custom_config_reserves_low_indices() {
    let mut reg = EntityRegistry::with_config(RegistryConfig {
        first_entity_index: 1000,
        index_limit: 2000,
    })
    .unwrap();
    let e = reg.spawn().unwrap();
    assert_eq!(e, 1000);
    // Reserved indices have no record and resolve to themselves.
    assert_eq!(reg.resolve_alive(500), 500);
    assert_eq!(Id::pair_in(&reg, 500, e).first().raw(), 500);
}
