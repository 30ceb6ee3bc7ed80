//! Driven adapters implementing the domain ports.

pub mod codes;
pub mod persistence;

pub use codes::RandomCodes;
pub use persistence::InMemoryStore;
