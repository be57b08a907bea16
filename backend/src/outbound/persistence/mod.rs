//! Persistence adapters implementing the driven ports.

mod memory;

pub use memory::MemoryStore;
