//! Deterministic k-permutation tables.
//!
//! A table for `n` tokens holds every ordered selection of `k` distinct token
//! positions for `k = 1..=n`, grouped by `k` ascending and in lexicographic
//! order within a group. Positions are stored as `u8`; `n` never exceeds
//! [`SearchConfig::MAX_TOKENS`](crate::config::SearchConfig::MAX_TOKENS).

use std::cell::OnceCell;

/// Number of ordered selections of `k` items out of `n`.
pub fn permutation_count(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    (n - k + 1..=n).product()
}

/// All k-permutations of `n` positions, for every `k` in `1..=n`.
#[derive(Debug, Clone)]
pub struct PermutationTable {
    n: usize,
    /// `groups[k - 1]` holds the permutations of length `k`, flattened.
    groups: Vec<Vec<u8>>,
}

impl PermutationTable {
    pub fn new(n: usize) -> Self {
        let mut groups = Vec::with_capacity(n);
        for k in 1..=n {
            let mut flat = Vec::with_capacity(permutation_count(n, k) * k);
            let mut prefix = Vec::with_capacity(k);
            let mut used = vec![false; n];
            extend(&mut prefix, &mut used, k, &mut flat);
            groups.push(flat);
        }
        Self { n, groups }
    }

    /// Number of positions the table permutes.
    pub fn width(&self) -> usize {
        self.n
    }

    /// Total number of permutations across all lengths.
    pub fn len(&self) -> usize {
        (1..=self.n).map(|k| permutation_count(self.n, k)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Permutations of exactly `k` positions.
    pub fn of_len(&self, k: usize) -> impl Iterator<Item = &[u8]> {
        let flat: &[u8] = if k == 0 {
            &[]
        } else {
            self.groups.get(k - 1).map(Vec::as_slice).unwrap_or(&[])
        };
        flat.chunks_exact(k.max(1))
    }

    /// Permutations of length `min_len` and longer, shortest first.
    pub fn from_len(&self, min_len: usize) -> impl Iterator<Item = &[u8]> {
        (min_len.max(1)..=self.n).flat_map(move |k| self.of_len(k))
    }
}

fn extend(prefix: &mut Vec<u8>, used: &mut [bool], k: usize, out: &mut Vec<u8>) {
    if prefix.len() == k {
        out.extend_from_slice(prefix);
        return;
    }
    for position in 0..used.len() {
        if used[position] {
            continue;
        }
        used[position] = true;
        prefix.push(position as u8);
        extend(prefix, used, k, out);
        prefix.pop();
        used[position] = false;
    }
}

/// Lazily built tables for token counts `0..=max`, shared by every entry
/// scored within one query.
#[derive(Debug)]
pub struct PermutationCache {
    tables: Vec<OnceCell<PermutationTable>>,
}

impl PermutationCache {
    pub fn new(max: usize) -> Self {
        Self {
            tables: (0..=max).map(|_| OnceCell::new()).collect(),
        }
    }

    /// Table for `n` positions, or `None` when `n` exceeds the cache bound.
    pub fn get(&self, n: usize) -> Option<&PermutationTable> {
        self.tables
            .get(n)
            .map(|cell| cell.get_or_init(|| PermutationTable::new(n)))
    }

    /// Number of tables built so far.
    pub fn built(&self) -> usize {
        self.tables.iter().filter(|cell| cell.get().is_some()).count()
    }
}
