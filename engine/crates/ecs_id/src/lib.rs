//! Bit-packed 64-bit identifiers for entities, components, tags,
//! relationship pairs and wildcards.
//!
//! The encoding lives in [`layout`]; [`Id`] and [`Entity`] wrap a raw value
//! together with an optional borrowed [`WorldContext`] that resolves
//! liveness, component types and names. [`EntityRegistry`] is a small
//! in-memory world implementing that trait.

pub mod entity;
pub mod error;
pub mod id;
pub mod layout;
pub mod registry;
pub mod render;
pub mod types;
pub mod world;

pub use entity::Entity;
pub use error::RegistryError;
pub use id::Id;
pub use layout::{
    ANY, AUTO_OVERRIDE, COMPONENT_MASK, ENTITY_MASK, GENERATION_MASK, ID_FLAGS_MASK, PAIR, TOGGLE,
    WILDCARD,
};
pub use registry::{EntityRegistry, RegistryConfig};
pub use types::EntityId;
pub use world::WorldContext;
