//! Catalog Core - keyword search over a locale-scoped catalog index.
//!
//! The index maps entry codes to descriptive fields (name, frequency, start
//! date, ...). A search splits the keyword into words, scores every entry by
//! how many of those words appear in its name and in which orders, and
//! returns the best matches.
//!
//! Nothing here fails on bad storage. A missing or corrupt index and a query
//! that runs out of time all come back as [`Advisory`] values next to the
//! (possibly empty) hits.
//!
//! # Example
//!
//! ```rust,no_run
//! use catalog_core::SearchEngine;
//!
//! let engine = SearchEngine::builder("/path/to/data").locale("EN").build()?;
//!
//! let outcome = engine.search("price index", 5, false)?;
//! for hit in &outcome.hits {
//!     println!("{} {} ({})", hit.code, hit.name, hit.score);
//! }
//! for advisory in &outcome.advisories {
//!     eprintln!("{}", advisory);
//! }
//! # Ok::<(), catalog_core::CatalogError>(())
//! ```

pub mod advisory;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod search;
pub mod store;

// Re-export commonly used types
pub use advisory::Advisory;
pub use config::{EngineConfig, Locale, SearchConfig, StorageConfig};
pub use engine::{EngineState, SearchEngine, SearchEngineBuilder, SearchHit, SearchOutcome};
pub use error::{CatalogError, Result};
pub use index::{Entry, Index};
pub use search::{
    Matcher, PatternGenerator, PatternSet, RankedEntry, Ranker, ScoringEngine, ScoringOutcome,
    ScoringStats, Scores,
};
pub use store::{IndexStore, LoadOutcome, LoadStatus};
