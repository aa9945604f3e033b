//! Per-entry scoring with token pruning and a wall-clock budget.
//!
//! For each entry the single-token matchers run first. A token whose
//! whole-word matcher misses cannot take part in any ordered match on that
//! entry, so ordered matchers are drawn only from the tokens that hit. The
//! pruning is local to the entry being scored.
//!
//! The budget is checked after every matcher evaluation. Once it is exceeded
//! the pass stops; scores gathered so far, including the partial score of the
//! entry in progress, are kept.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::SearchConfig;
use crate::index::Index;
use crate::search::pattern::{CaseMode, Matcher, PatternSet};

/// Scores of matching entries, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scores {
    entries: Vec<(String, u32)>,
}

impl Scores {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, code: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(code, score)| (code.as_str(), *score))
    }

    fn push(&mut self, code: &str, score: u32) {
        self.entries.push((code.to_string(), score));
    }
}

impl FromIterator<(String, u32)> for Scores {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().filter(|(_, score)| *score > 0).collect(),
        }
    }
}

/// Work done by one scoring pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringStats {
    pub entries_visited: usize,
    pub evaluations: u64,
    pub elapsed: Duration,
}

/// Result of [`ScoringEngine::score`].
#[derive(Debug, Clone)]
pub struct ScoringOutcome {
    pub scores: Scores,
    pub timed_out: bool,
    pub stats: ScoringStats,
}

struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    fn expired(&self) -> bool {
        self.started.elapsed() > self.budget
    }
}

/// Evaluates a [`PatternSet`] against every entry of an [`Index`].
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    budget: Duration,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(SearchConfig::DEFAULT_TIME_BUDGET)
    }
}

impl ScoringEngine {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Score every entry of `index` against `patterns`.
    pub fn score(&self, index: &Index, patterns: &PatternSet) -> ScoringOutcome {
        let deadline = Deadline::start(self.budget);
        let mut stats = ScoringStats::default();
        let mut scores = Scores::default();
        let mut timed_out = false;

        if !patterns.is_empty() {
            let tokens: Vec<&str> = patterns.tokens().iter().map(String::as_str).collect();
            let mut scratch = Scratch::with_capacity(tokens.len());

            for (code, entry) in index.iter() {
                stats.entries_visited += 1;
                let name = match patterns.case_mode() {
                    CaseMode::Insensitive => entry.folded_name(),
                    CaseMode::Sensitive => entry.name(),
                };

                let (score, expired) = self.score_entry(
                    name,
                    &tokens,
                    &mut scratch,
                    patterns,
                    &deadline,
                    &mut stats,
                );
                if score > 0 {
                    scores.push(code, score);
                }
                if expired {
                    timed_out = true;
                    break;
                }
            }
        }

        stats.elapsed = deadline.started.elapsed();
        debug!(
            "Scored {} entries with {} evaluations in {:?} ({} hits{})",
            stats.entries_visited,
            stats.evaluations,
            stats.elapsed,
            scores.len(),
            if timed_out { ", timed out" } else { "" }
        );

        ScoringOutcome {
            scores,
            timed_out,
            stats,
        }
    }

    /// Score one entry name. Returns the score and whether the deadline
    /// passed during evaluation.
    fn score_entry<'t>(
        &self,
        name: &str,
        tokens: &[&'t str],
        scratch: &mut Scratch<'t>,
        patterns: &PatternSet,
        deadline: &Deadline,
        stats: &mut ScoringStats,
    ) -> (u32, bool) {
        let mut score = 0u32;
        let Scratch { surviving, selected } = scratch;
        surviving.clear();

        for &token in tokens {
            stats.evaluations += 1;
            let matcher = Matcher::Word(token);
            if matcher.matches(name) {
                score += matcher.weight();
                surviving.push(token);
            }
            if deadline.expired() {
                return (score, true);
            }
        }

        // Every copy of a token shares the same verdict, so keeping the hits
        // is the same as dropping excluded token texts.
        if surviving.len() < 2 {
            return (score, false);
        }
        let Some(table) = patterns.permutations(surviving.len()) else {
            return (score, false);
        };

        for positions in table.from_len(2) {
            stats.evaluations += 1;
            selected.clear();
            selected.extend(positions.iter().map(|&i| surviving[i as usize]));
            let matcher = Matcher::Ordered(selected.as_slice());
            if matcher.matches(name) {
                score += matcher.weight();
            }
            if deadline.expired() {
                return (score, true);
            }
        }

        (score, false)
    }
}

/// Token buffers reused across the entries of one pass.
struct Scratch<'t> {
    /// Query tokens whose whole-word matcher hit the current entry.
    surviving: Vec<&'t str>,
    /// Tokens of the ordered matcher being evaluated.
    selected: Vec<&'t str>,
}

impl<'t> Scratch<'t> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            surviving: Vec::with_capacity(capacity),
            selected: Vec::with_capacity(capacity),
        }
    }
}
