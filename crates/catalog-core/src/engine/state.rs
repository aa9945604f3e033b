//! Session state of a search engine.

use std::sync::Arc;

use crate::index::Index;

/// Whether an index is loaded.
///
/// `Uninitialized` → (load) → `Ready` → (locale change) → `Uninitialized`.
/// A load that yields no entries leaves the engine `Uninitialized`, so the
/// next search retries it.
#[derive(Debug, Clone, Default)]
pub enum EngineState {
    #[default]
    Uninitialized,
    /// Loaded, non-empty index. Searches score against a clone of this `Arc`,
    /// so swapping it never affects a search in flight.
    Ready(Arc<Index>),
}

impl EngineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, EngineState::Ready(_))
    }

    pub fn snapshot(&self) -> Option<Arc<Index>> {
        match self {
            EngineState::Ready(index) => Some(Arc::clone(index)),
            EngineState::Uninitialized => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Ready(_) => "ready",
        }
    }
}
