mod in_memory_home_backend;

pub use in_memory_home_backend::{HomeRecord, InMemoryHomeBackend};
