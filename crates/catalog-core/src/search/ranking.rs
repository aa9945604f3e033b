//! Top-N selection over entry scores.

use crate::search::scoring::Scores;

/// One ranked entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub code: String,
    pub score: u32,
}

/// Orders scores descending and keeps the first `n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker;

impl Ranker {
    pub fn new() -> Self {
        Ranker
    }

    /// Rank `scores`, highest first.
    ///
    /// The sort is stable, so equal scores stay in index order.
    pub fn rank(&self, scores: &Scores, n: usize) -> Vec<RankedEntry> {
        if n == 0 {
            return Vec::new();
        }

        let mut ordered: Vec<(&str, u32)> = scores.iter().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));

        ordered
            .into_iter()
            .take(n)
            .map(|(code, score)| RankedEntry {
                code: code.to_string(),
                score,
            })
            .collect()
    }
}
