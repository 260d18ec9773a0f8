pub mod memory;

pub use memory::MemoryPrincipalStore;
