// Adapters layer: concrete implementations of the domain ports.

pub mod storage;

pub use storage::{JsonFileStore, MemoryStore};
