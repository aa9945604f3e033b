//! Recovered conditions reported alongside search results.

use std::path::PathBuf;
use std::time::Duration;

/// A condition the engine recovered from locally.
///
/// Advisories never abort a search. Each one is logged at warn level when it
/// is raised and handed back in [`SearchOutcome`](crate::SearchOutcome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// No usable index after a load attempt (absent or empty).
    IndexUnavailable { path: PathBuf },
    /// The index file could not be decoded and was removed.
    IndexCorrupt { path: PathBuf, removed: bool },
    /// The index file exists but could not be read.
    IndexUnreadable { path: PathBuf, message: String },
    /// Scoring stopped early; results are partial.
    SearchTimedOut { budget: Duration },
    /// Tokens past the cap were ignored.
    QueryTruncated { kept: usize, dropped: usize },
}

impl Advisory {
    /// True for advisories that mean the result set is incomplete rather
    /// than empty for lack of data.
    pub fn is_partial_result(&self) -> bool {
        matches!(self, Advisory::SearchTimedOut { .. })
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::IndexUnavailable { path } => write!(
                f,
                "no index found at {}; build one before searching",
                path.display()
            ),
            Advisory::IndexCorrupt { path, removed: true } => write!(
                f,
                "index at {} could not be decoded and was removed",
                path.display()
            ),
            Advisory::IndexCorrupt {
                path,
                removed: false,
            } => write!(
                f,
                "index at {} could not be decoded and could not be removed",
                path.display()
            ),
            Advisory::IndexUnreadable { path, message } => {
                write!(f, "index at {} could not be read: {}", path.display(), message)
            }
            Advisory::SearchTimedOut { budget } => write!(
                f,
                "searching took more than {:.1} seconds and was interrupted; \
                 try fewer words (up to 6 works best)",
                budget.as_secs_f64()
            ),
            Advisory::QueryTruncated { kept, dropped } => write!(
                f,
                "only the first {} words were searched; {} more were ignored",
                kept, dropped
            ),
        }
    }
}
