//! Search sessions over a locale-scoped catalog index.
//!
//! [`SearchEngine`] owns the configuration, the active locale and the loaded
//! index. The index is loaded lazily on the first search and dropped on a
//! locale change. All storage and timing problems come back as
//! [`Advisory`] values on the outcome; only a bad keyword or locale is an
//! error.

mod builder;
mod state;

pub use builder::SearchEngineBuilder;
pub use state::EngineState;

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::advisory::Advisory;
use crate::config::{EngineConfig, Locale};
use crate::error::{CatalogError, Result};
use crate::index::Index;
use crate::search::{PatternGenerator, Ranker, ScoringEngine, ScoringStats};
use crate::store::{IndexStore, LoadStatus};

/// One search result: the entry code, its score and the first three fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub code: String,
    pub score: u32,
    pub name: String,
    pub frequency: String,
    pub start_date: String,
}

impl SearchHit {
    /// Name, frequency and start date, in storage order.
    pub fn fields(&self) -> [&str; 3] {
        [&self.name, &self.frequency, &self.start_date]
    }
}

/// Everything a search call produced.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Hits ordered by descending score, ties in index order.
    pub hits: Vec<SearchHit>,
    /// Conditions recovered from during the call.
    pub advisories: Vec<Advisory>,
    pub timed_out: bool,
    /// Present when a scoring pass ran.
    pub stats: Option<ScoringStats>,
}

impl SearchOutcome {
    fn unavailable(advisory: Option<Advisory>) -> Self {
        Self {
            advisories: advisory.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn get(&self, code: &str) -> Option<&SearchHit> {
        self.hits.iter().find(|hit| hit.code == code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.hits.iter().map(|hit| hit.code.as_str())
    }
}

struct Session {
    store: IndexStore,
    state: EngineState,
}

/// Keyword search over one locale's catalog index.
///
/// The engine is `Send + Sync`. Searches read a shared snapshot of the index;
/// reloads and locale changes swap the snapshot under a write lock.
pub struct SearchEngine {
    config: EngineConfig,
    session: RwLock<Session>,
}

impl SearchEngine {
    /// Create a builder for a SearchEngine.
    pub fn builder(data_dir: impl Into<PathBuf>) -> SearchEngineBuilder {
        SearchEngineBuilder::new(data_dir)
    }

    /// Create an engine for the given locale code.
    pub fn new(config: EngineConfig, locale: &str) -> Result<Self> {
        let locale = Locale::parse(locale)?;
        config.validate()?;
        Ok(Self::with_config(config, locale))
    }

    pub(crate) fn with_config(config: EngineConfig, locale: Locale) -> Self {
        let store = IndexStore::for_locale(&config, locale);
        Self {
            config,
            session: RwLock::new(Session {
                store,
                state: EngineState::Uninitialized,
            }),
        }
    }

    // ========================================
    // Lock helpers
    // ========================================

    // The guarded data is only ever replaced whole, so a poisoned lock still
    // holds a consistent value.
    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }

    // ========================================
    // Accessors
    // ========================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn locale(&self) -> Locale {
        self.read().store.locale()
    }

    pub fn index_path(&self) -> PathBuf {
        self.read().store.path().to_path_buf()
    }

    pub fn is_ready(&self) -> bool {
        self.read().state.is_ready()
    }

    pub fn state(&self) -> EngineState {
        self.read().state.clone()
    }

    /// Number of entries in the loaded index; 0 before the first load.
    pub fn entry_count(&self) -> usize {
        self.read().state.snapshot().map_or(0, |index| index.len())
    }

    /// Days since the index file was written, or -1 if there is none.
    pub fn age_in_days(&self) -> i64 {
        self.read().store.age_in_days()
    }

    // ========================================
    // State transitions
    // ========================================

    /// Switch to another locale.
    ///
    /// The code is validated before anything else happens. On success the
    /// loaded index is dropped and the next search loads the new locale's
    /// file.
    pub fn set_locale(&self, code: &str) -> Result<()> {
        let locale = Locale::parse(code)?;
        let mut session = self.write();
        session.store = IndexStore::for_locale(&self.config, locale);
        session.state = EngineState::Uninitialized;
        debug!(
            "Locale set to {}, index path {}",
            locale,
            session.store.path().display()
        );
        Ok(())
    }

    /// Reload the index from storage now.
    ///
    /// Returns the advisory for the load when it did not produce a usable
    /// index.
    pub fn refresh(&self) -> Option<Advisory> {
        let mut session = self.write();
        Self::load_into(&mut session).err()
    }

    /// Load into `session`, moving it to `Ready` on a non-empty index.
    fn load_into(session: &mut Session) -> std::result::Result<Arc<Index>, Advisory> {
        let outcome = session.store.load();
        let advisory = outcome.advisory(session.store.path());

        if outcome.status == LoadStatus::Loaded {
            let index = Arc::new(outcome.index);
            session.state = EngineState::Ready(Arc::clone(&index));
            return Ok(index);
        }

        session.state = EngineState::Uninitialized;
        let advisory = advisory.unwrap_or_else(|| Advisory::IndexUnavailable {
            path: session.store.path().to_path_buf(),
        });
        warn!("{}", advisory);
        Err(advisory)
    }

    /// Current index snapshot, loading it first if needed.
    fn snapshot(&self) -> std::result::Result<Arc<Index>, Advisory> {
        if let Some(index) = self.read().state.snapshot() {
            return Ok(index);
        }

        let mut session = self.write();
        // Another caller may have loaded while we waited for the lock.
        if let Some(index) = session.state.snapshot() {
            return Ok(index);
        }
        Self::load_into(&mut session)
    }

    // ========================================
    // Query interface
    // ========================================

    /// Find the entries that best match `keyword`.
    ///
    /// Returns at most `limit` hits. With `verbose` each hit is logged at
    /// info level. Fails only when `keyword` has no words; a missing or
    /// broken index and a timed-out scoring pass come back as advisories.
    pub fn search(&self, keyword: &str, limit: usize, verbose: bool) -> Result<SearchOutcome> {
        if keyword.trim().is_empty() {
            return Err(CatalogError::empty_keyword());
        }

        let index = match self.snapshot() {
            Ok(index) => index,
            Err(advisory) => return Ok(SearchOutcome::unavailable(Some(advisory))),
        };

        let patterns = PatternGenerator::from_config(&self.config).generate(keyword);
        let mut advisories = Vec::new();
        if patterns.dropped_tokens() > 0 {
            let advisory = Advisory::QueryTruncated {
                kept: patterns.tokens().len(),
                dropped: patterns.dropped_tokens(),
            };
            info!("{}", advisory);
            advisories.push(advisory);
        }

        let scoring = ScoringEngine::new(self.config.time_budget).score(&index, &patterns);
        if scoring.timed_out {
            let advisory = Advisory::SearchTimedOut {
                budget: self.config.time_budget,
            };
            warn!("{}", advisory);
            advisories.push(advisory);
        }

        let hits: Vec<SearchHit> = Ranker::new()
            .rank(&scoring.scores, limit)
            .into_iter()
            .filter_map(|ranked| {
                let [name, frequency, start_date] = index.get(&ranked.code)?.summary();
                Some(SearchHit {
                    code: ranked.code,
                    score: ranked.score,
                    name,
                    frequency,
                    start_date,
                })
            })
            .collect();

        if verbose {
            log_hits(keyword, &hits);
        }

        Ok(SearchOutcome {
            hits,
            advisories,
            timed_out: scoring.timed_out,
            stats: Some(scoring.stats),
        })
    }

    /// Storage location currently backing the engine.
    pub fn storage(&self) -> IndexStore {
        self.read().store.clone()
    }
}

fn log_hits(keyword: &str, hits: &[SearchHit]) {
    if hits.is_empty() {
        info!("Nothing found for '{}'", keyword);
        return;
    }
    info!("{} most relevant results for '{}'", hits.len(), keyword);
    for hit in hits {
        info!(
            code = %hit.code,
            score = hit.score,
            frequency = %hit.frequency,
            start = %hit.start_date,
            "{}",
            hit.name
        );
    }
}
