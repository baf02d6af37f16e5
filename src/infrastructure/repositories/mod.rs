//! Entity store implementations

pub mod entity_store;
pub mod memory_store;

pub use entity_store::SeaOrmEntityStore;
pub use memory_store::MemoryEntityStore;
