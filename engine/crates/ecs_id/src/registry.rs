use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::layout::{self, ENTITY_MASK, FIRST_USER_ENTITY_ID, ID_FLAGS_MASK, PAIR_FIRST_BITS};
use crate::render;
use crate::world::WorldContext;

/// Entity registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// First index handed out. Indices below it are left to builtins.
    pub first_entity_index: u32,
    /// Exclusive upper bound on indices. At most `1 << PAIR_FIRST_BITS` so
    /// every index is usable as the first part of a pair.
    pub index_limit: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            first_entity_index: FIRST_USER_ENTITY_ID,
            index_limit: 1 << PAIR_FIRST_BITS,
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.first_entity_index >= self.index_limit {
            return Err(RegistryError::InvalidConfig(format!(
                "first_entity_index {} must be below index_limit {}",
                self.first_entity_index, self.index_limit
            )));
        }
        if self.index_limit > 1 << PAIR_FIRST_BITS {
            return Err(RegistryError::InvalidConfig(format!(
                "index_limit {} exceeds the {}-bit pair first part",
                self.index_limit, PAIR_FIRST_BITS
            )));
        }
        Ok(())
    }
}

/// In-memory world: generational entity slots, names and component sizes.
///
/// Slot `n` holds the entity with index `first_entity_index + n`. Freed
/// indices are reused with their generation bumped, so handles to a
/// despawned entity stop resolving.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RegistrySnapshot")]
pub struct EntityRegistry {
    config: RegistryConfig,
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_indices: Vec<u32>,
    names: HashMap<u32, String>,
    by_name: HashMap<String, u32>,
    /// Size in bytes per component index; `0` marks a tag.
    components: HashMap<u32, u32>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::from_valid_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Result<Self, RegistryError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: RegistryConfig) -> Self {
        Self {
            config,
            generations: Vec::new(),
            alive: Vec::new(),
            free_indices: Vec::new(),
            names: HashMap::new(),
            by_name: HashMap::new(),
            components: HashMap::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Allocate an entity and return its generation-stamped handle.
    pub fn spawn(&mut self) -> Result<u64, RegistryError> {
        if let Some(index) = self.free_indices.pop() {
            let slot = self.slot_unchecked(index);
            let bumped = layout::generation_inc(layout::stamp(index, self.generations[slot]));
            self.generations[slot] = layout::generation(bumped);
            self.alive[slot] = true;
            tracing::debug!(
                index,
                generation = self.generations[slot],
                "entity recycled"
            );
            return Ok(bumped);
        }

        let index = self.config.first_entity_index as u64 + self.generations.len() as u64;
        if index >= self.config.index_limit as u64 {
            return Err(RegistryError::CapacityExceeded {
                index_limit: self.config.index_limit,
            });
        }
        self.generations.push(0);
        self.alive.push(true);
        tracing::debug!(index, "entity spawned");
        Ok(index)
    }

    pub fn despawn(&mut self, entity: u64) -> Result<(), RegistryError> {
        if !self.is_alive(entity) {
            tracing::warn!(entity, "despawn of dead entity rejected");
            return Err(RegistryError::NotAlive(entity));
        }
        let index = (entity & ENTITY_MASK) as u32;
        let slot = self.slot_unchecked(index);
        self.alive[slot] = false;
        self.free_indices.push(index);
        if let Some(name) = self.names.remove(&index) {
            self.by_name.remove(&name);
        }
        self.components.remove(&index);
        tracing::debug!(
            index,
            generation = self.generations[slot],
            "entity despawned"
        );
        Ok(())
    }

    /// True when `entity` is exactly the current handle of its index.
    pub fn is_alive(&self, entity: u64) -> bool {
        self.get_alive((entity & ENTITY_MASK) as u32) == Some(entity)
    }

    /// Current handle of `index`, if the slot holds a live entity.
    pub fn get_alive(&self, index: u32) -> Option<u64> {
        let slot = self.slot(index)?;
        if self.alive[slot] {
            Some(layout::stamp(index, self.generations[slot]))
        } else {
            None
        }
    }

    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    pub fn set_name(&mut self, entity: u64, name: impl Into<String>) -> Result<(), RegistryError> {
        if !self.is_alive(entity) {
            return Err(RegistryError::NotAlive(entity));
        }
        let name = name.into();
        let index = (entity & ENTITY_MASK) as u32;
        if let Some(&owner) = self.by_name.get(&name) {
            if owner == index {
                return Ok(());
            }
            return Err(RegistryError::NameTaken {
                owner: self.get_alive(owner).unwrap_or(owner as u64),
                name,
            });
        }
        if let Some(old) = self.names.insert(index, name.clone()) {
            self.by_name.remove(&old);
        }
        self.by_name.insert(name, index);
        Ok(())
    }

    pub fn name(&self, entity: u64) -> Option<&str> {
        if !self.is_alive(entity) {
            return None;
        }
        self.names
            .get(&((entity & ENTITY_MASK) as u32))
            .map(String::as_str)
    }

    pub fn lookup(&self, name: &str) -> Option<u64> {
        let index = *self.by_name.get(name)?;
        self.get_alive(index)
    }

    /// Mark `entity` as a component of `size` bytes, or a tag when `size`
    /// is zero.
    pub fn register_component(&mut self, entity: u64, size: u32) -> Result<(), RegistryError> {
        if !self.is_alive(entity) {
            return Err(RegistryError::NotAlive(entity));
        }
        self.components.insert((entity & ENTITY_MASK) as u32, size);
        Ok(())
    }

    pub fn component_size(&self, entity: u64) -> Option<u32> {
        if !self.is_alive(entity) {
            return None;
        }
        self.components
            .get(&((entity & ENTITY_MASK) as u32))
            .copied()
    }

    fn has_type_info(&self, entity: u64) -> bool {
        let index = (entity & ENTITY_MASK) as u32;
        self.components.get(&index).is_some_and(|&size| size > 0)
    }

    fn path(&self, entity: u64) -> String {
        let index = (entity & ENTITY_MASK) as u32;
        let unstamped = layout::generation(entity) == 0;
        let current = self
            .get_alive(index)
            .filter(|&handle| unstamped || handle == entity);
        match current.and_then(|_| self.names.get(&index)) {
            Some(name) => name.clone(),
            None => render::entity_path(entity),
        }
    }

    fn slot(&self, index: u32) -> Option<usize> {
        let slot = index.checked_sub(self.config.first_entity_index)? as usize;
        (slot < self.generations.len()).then_some(slot)
    }

    fn slot_unchecked(&self, index: u32) -> usize {
        (index - self.config.first_entity_index) as usize
    }
}

/// Unchecked serialized form, validated before it becomes a registry.
#[derive(Serialize, Deserialize)]
struct RegistrySnapshot {
    config: RegistryConfig,
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_indices: Vec<u32>,
    names: HashMap<u32, String>,
    by_name: HashMap<String, u32>,
    components: HashMap<u32, u32>,
}

impl TryFrom<RegistrySnapshot> for EntityRegistry {
    type Error = RegistryError;

    fn try_from(snapshot: RegistrySnapshot) -> Result<Self, Self::Error> {
        snapshot.config.validate()?;
        let corrupt = |msg: String| Err(RegistryError::CorruptSnapshot(msg));

        if snapshot.generations.len() != snapshot.alive.len() {
            return corrupt(format!(
                "{} generations for {} slots",
                snapshot.generations.len(),
                snapshot.alive.len()
            ));
        }
        let end = snapshot.config.first_entity_index as u64 + snapshot.alive.len() as u64;
        if end > snapshot.config.index_limit as u64 {
            return corrupt(format!(
                "{} slots exceed index_limit {}",
                snapshot.alive.len(),
                snapshot.config.index_limit
            ));
        }
        let first = snapshot.config.first_entity_index;
        let slot_of = |index: u32| {
            index
                .checked_sub(first)
                .map(|slot| slot as usize)
                .filter(|&slot| slot < snapshot.alive.len())
        };

        let mut seen = HashSet::new();
        for &index in &snapshot.free_indices {
            match slot_of(index) {
                Some(slot) if !snapshot.alive[slot] && seen.insert(index) => {}
                _ => return corrupt(format!("free index {} is not a dead slot", index)),
            }
        }
        let live = |index: &u32| slot_of(*index).is_some_and(|slot| snapshot.alive[slot]);
        if let Some(index) = snapshot.names.keys().find(|&index| !live(index)) {
            return corrupt(format!("name on dead index {}", index));
        }
        if let Some(index) = snapshot.components.keys().find(|&index| !live(index)) {
            return corrupt(format!("component on dead index {}", index));
        }
        let names_agree = snapshot.names.len() == snapshot.by_name.len()
            && snapshot
                .by_name
                .iter()
                .all(|(name, index)| snapshot.names.get(index) == Some(name));
        if !names_agree {
            return corrupt("name tables disagree".to_owned());
        }

        Ok(Self {
            config: snapshot.config,
            generations: snapshot.generations,
            alive: snapshot.alive,
            free_indices: snapshot.free_indices,
            names: snapshot.names,
            by_name: snapshot.by_name,
            components: snapshot.components,
        })
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldContext for EntityRegistry {
    /// Live handle for the index; `0` when the slot is dead; `entity`
    /// unchanged for indices the registry never allocated.
    fn resolve_alive(&self, entity: u64) -> u64 {
        let index = (entity & ENTITY_MASK) as u32;
        match self.slot(index) {
            Some(_) => self.get_alive(index).unwrap_or(0),
            None => entity,
        }
    }

    fn resolve_component_type(&self, id: u64) -> u64 {
        if layout::is_pair(id) {
            let first = layout::pair_first(id);
            if self.has_type_info(first) {
                return self.resolve_alive(first);
            }
            let second = layout::pair_second(id);
            if self.has_type_info(second) {
                return self.resolve_alive(second);
            }
            return 0;
        }
        if id & ID_FLAGS_MASK != 0 {
            return 0;
        }
        if self.has_type_info(id) {
            self.resolve_alive(id)
        } else {
            0
        }
    }

    fn render_id(&self, id: u64) -> String {
        render::id_str(id, |entity| self.path(entity))
    }
}
