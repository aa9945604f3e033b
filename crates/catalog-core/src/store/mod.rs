//! On-disk storage for catalog indices.
//!
//! This module provides:
//! - Atomic JSON read/write helpers
//! - The locale-scoped [`IndexStore`] with self-healing loads

mod atomic;
mod index_store;

pub use atomic::{atomic_read_json, atomic_write_json, discard_file};
pub use index_store::{IndexStore, LoadOutcome, LoadStatus};
