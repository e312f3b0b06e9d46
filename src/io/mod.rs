//! I/O module
//!
//! Durable storage for the ledger collections:
//! - `kv` - sled-backed key-value store with JSON serialization

pub mod kv;

pub use kv::KvStore;
