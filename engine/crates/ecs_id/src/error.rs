#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("entity capacity exceeded: index_limit={index_limit}")]
    CapacityExceeded { index_limit: u32 },

    #[error("entity {0:#x} is not alive")]
    NotAlive(u64),

    #[error("name {name:?} is already used by entity {owner:#x}")]
    NameTaken { name: String, owner: u64 },

    #[error("invalid registry config: {0}")]
    InvalidConfig(String),

    #[error("corrupt registry snapshot: {0}")]
    CorruptSnapshot(String),
}
