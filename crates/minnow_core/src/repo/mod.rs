//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value blob contract the item store persists through.
//! - Isolate SQLite details from the store's orchestration.
//!
//! # Invariants
//! - Keys are non-blank; values are opaque bytes.
//! - A write replaces the whole value stored under a key.

pub mod blob_repo;
