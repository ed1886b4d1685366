//! `KeyValueStorage` implementations.

mod file;
mod memory;

pub use file::FileKeyValueStorage;
pub use memory::MemoryKeyValueStorage;
