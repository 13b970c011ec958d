pub mod export;
pub mod json_store;
pub mod keys;
pub mod kv;

pub use json_store::JsonStore;
pub use kv::{KeyValueStore, MemoryStore, SharedStore};
