//! # storage-adapters
//!
//! Implementations of the `domains` ports. Only the in-memory store ships
//! today; it backs the seed binary and the integration tests.

pub mod memory;

pub use memory::MemoryStore;
