//! Builder for configuring SearchEngine initialization.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::{EngineConfig, Locale};
use crate::engine::SearchEngine;
use crate::error::Result;

/// Builder for configuring [`SearchEngine`] initialization.
///
/// # Example
///
/// ```rust,no_run
/// use catalog_core::SearchEngine;
/// use std::time::Duration;
///
/// let engine = SearchEngine::builder("./data")
///     .locale("EN")
///     .time_budget(Duration::from_secs(2))
///     .build()?;
/// # Ok::<(), catalog_core::CatalogError>(())
/// ```
pub struct SearchEngineBuilder {
    config: EngineConfig,
    locale: String,
}

impl SearchEngineBuilder {
    /// Create a new builder over the directory holding the index files.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config: EngineConfig::new(data_dir),
            locale: Locale::default().as_str().to_string(),
        }
    }

    /// Index locale code. Any alias accepted by [`Locale::from_str`] works.
    ///
    /// Default: `TR`
    pub fn locale(mut self, code: impl Into<String>) -> Self {
        self.locale = code.into();
        self
    }

    /// Wall-clock budget for scoring one query.
    ///
    /// Default: 4 seconds
    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.config.time_budget = budget;
        self
    }

    /// Maximum tokens taken from a keyword string, 1 to 8.
    ///
    /// Default: 8
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Match names case-sensitively.
    ///
    /// Default: `false`
    pub fn case_sensitive(mut self, enable: bool) -> Self {
        self.config.case_sensitive = enable;
        self
    }

    /// Use an explicit index file for `locale` instead of the data
    /// directory layout.
    pub fn index_path(mut self, locale: Locale, path: impl Into<PathBuf>) -> Self {
        self.config.index_paths.insert(locale, path.into());
        self
    }

    /// Validate the configuration and build the engine.
    ///
    /// Fails on an unsupported locale or an out-of-range token cap. No
    /// storage is touched.
    pub fn build(self) -> Result<SearchEngine> {
        let locale = Locale::parse(&self.locale)?;
        self.config.validate()?;
        Ok(SearchEngine::with_config(self.config, locale))
    }
}
