//! Centralized configuration for the catalog search engine.
//!
//! Constants live on unit structs grouped by concern. The runtime
//! [`EngineConfig`] value is assembled by
//! [`SearchEngineBuilder`](crate::SearchEngineBuilder) and handed to the engine
//! at construction; nothing here is global or mutable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CatalogError, Result};

/// Search tuning parameters.
pub struct SearchConfig;

impl SearchConfig {
    /// Wall-clock budget for the entry scoring pass of one search.
    pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(4);
    /// Tokens beyond this count are dropped. Permutation count grows
    /// factorially, so this is also the ceiling accepted from callers.
    pub const MAX_TOKENS: usize = 8;
    pub const DEFAULT_LIMIT: usize = 5;
    /// Fields projected from each hit: name, frequency, start date.
    pub const PROJECTED_FIELDS: usize = 3;
}

/// Storage layout.
pub struct StorageConfig;

impl StorageConfig {
    pub const INDEX_FILE_PREFIX: &'static str = "catalog_index_";
    pub const INDEX_FILE_EXTENSION: &'static str = "json";
    pub const DATA_DIR_NAME: &'static str = "catalog-search";
}

/// Supported index locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    Turkish,
    English,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Turkish, Locale::English];

    /// Canonical code of the locale.
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Turkish => "TR",
            Locale::English => "ENG",
        }
    }

    /// Suffix used in the index file name.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Locale::Turkish => "tr",
            Locale::English => "en",
        }
    }

    /// Parse a locale code, accepting the usual aliases.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "TR" | "TUR" | "tr" | "tur" => Some(Locale::Turkish),
            "ENG" | "EN" | "eng" | "en" => Some(Locale::English),
            _ => None,
        }
    }

    /// Like [`Locale::from_str`], but reports unknown codes as an error.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| CatalogError::UnsupportedLocale {
            code: s.trim().to_string(),
        })
    }

    /// Default index file name for this locale.
    pub fn index_file_name(&self) -> String {
        format!(
            "{}{}.{}",
            StorageConfig::INDEX_FILE_PREFIX,
            self.file_suffix(),
            StorageConfig::INDEX_FILE_EXTENSION
        )
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Turkish
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime configuration of a search engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding the per-locale index files.
    pub data_dir: PathBuf,
    /// Explicit index locations that override the data directory layout.
    pub index_paths: HashMap<Locale, PathBuf>,
    pub time_budget: Duration,
    pub max_tokens: usize,
    pub case_sensitive: bool,
}

impl EngineConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            index_paths: HashMap::new(),
            time_budget: SearchConfig::DEFAULT_TIME_BUDGET,
            max_tokens: SearchConfig::MAX_TOKENS,
            case_sensitive: false,
        }
    }

    /// Storage location backing the given locale.
    pub fn index_path(&self, locale: Locale) -> PathBuf {
        match self.index_paths.get(&locale) {
            Some(path) => path.clone(),
            None => self.data_dir.join(locale.index_file_name()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Reject values the engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 || self.max_tokens > SearchConfig::MAX_TOKENS {
            return Err(CatalogError::Config {
                message: format!(
                    "max_tokens must be between 1 and {}, got {}",
                    SearchConfig::MAX_TOKENS,
                    self.max_tokens
                ),
            });
        }
        Ok(())
    }
}
