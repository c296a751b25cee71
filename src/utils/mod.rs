//! Utility modules: input validation and an in-memory certificate store

pub mod memory_store;
pub mod validation;

pub use memory_store::MemoryStore;
pub use validation::*;
