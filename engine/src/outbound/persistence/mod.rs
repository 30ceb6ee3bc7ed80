//! Persistence adapters.
//!
//! The engine ships one reference adapter, an in-memory store, which is
//! enough for tests and embedded callers; production deployments supply
//! their own adapter over a real database, keeping the same port
//! contracts (including the insert-time backstops).

pub mod memory;

pub use memory::InMemoryStore;
