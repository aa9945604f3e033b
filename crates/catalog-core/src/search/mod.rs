//! Permutation-based keyword search.
//!
//! This module provides:
//! - Tokenization and typed matchers ([`Matcher`])
//! - Matcher generation from keyword strings ([`PatternGenerator`])
//! - Cached permutation tables
//! - Per-entry scoring under a time budget ([`ScoringEngine`])
//! - Top-N ranking ([`Ranker`])

mod pattern;
mod permutation;
mod ranking;
mod scoring;

pub use pattern::{
    contains_in_order, contains_word, fold_case, tokenize, CaseMode, Matcher, PatternGenerator,
    PatternSet,
};
pub use permutation::{permutation_count, PermutationCache, PermutationTable};
pub use ranking::{RankedEntry, Ranker};
pub use scoring::{ScoringEngine, ScoringOutcome, ScoringStats, Scores};
