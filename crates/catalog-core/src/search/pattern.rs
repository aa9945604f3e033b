//! Keyword tokenization and matcher generation.
//!
//! A keyword string expands into one single-token whole-word matcher per token
//! plus one ordered matcher per permutation of two or more tokens. Matchers
//! compare literal text; nothing in a token is interpreted as pattern syntax.

use std::borrow::Cow;

use crate::config::{EngineConfig, SearchConfig};
use crate::search::permutation::{permutation_count, PermutationCache, PermutationTable};

/// Split a keyword string on whitespace into non-empty tokens.
///
/// Order is preserved and duplicates are kept.
pub fn tokenize(keyword: &str) -> Vec<&str> {
    keyword.split_whitespace().collect()
}

/// Case handling for matcher evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    #[default]
    Insensitive,
    Sensitive,
}

impl CaseMode {
    pub fn from_sensitive(case_sensitive: bool) -> Self {
        if case_sensitive {
            CaseMode::Sensitive
        } else {
            CaseMode::Insensitive
        }
    }

    /// Bring text into the form matchers compare against.
    pub fn fold<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            CaseMode::Insensitive => Cow::Owned(fold_case(text)),
            CaseMode::Sensitive => Cow::Borrowed(text),
        }
    }
}

/// Lowercase `text` one character at a time.
///
/// `İ` folds to a plain `i` rather than `i` plus a combining dot, so Turkish
/// names match keywords typed in lowercase. Entry names and query tokens must
/// both go through this function.
pub fn fold_case(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{130}' => folded.push('i'),
            c => folded.extend(c.to_lowercase()),
        }
    }
    folded
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A token edge made of a word character must not touch another word
/// character. Punctuation edges carry no constraint.
fn edge_is_free(edge: Option<char>, neighbour: Option<char>) -> bool {
    !edge.is_some_and(is_word_char) || !neighbour.is_some_and(is_word_char)
}

/// Byte length of the first char at `at`, so scanning can resume one
/// character later and still see overlapping occurrences.
fn step(haystack: &str, at: usize) -> usize {
    haystack[at..].chars().next().map_or(1, char::len_utf8)
}

/// True if `word` occurs in `haystack` as a whole word.
pub fn contains_word(haystack: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let first = word.chars().next();
    let last = word.chars().next_back();

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(word) {
        let start = from + offset;
        let end = start + word.len();
        if edge_is_free(first, haystack[..start].chars().next_back())
            && edge_is_free(last, haystack[end..].chars().next())
        {
            return true;
        }
        from = start + step(haystack, start);
    }
    false
}

/// True if the tokens occur in `haystack` in the given order.
///
/// Every token except the last must be directly followed by whitespace;
/// anything may sit between that whitespace and the next token. The last
/// token only has to occur.
pub fn contains_in_order<'a, I>(haystack: &str, tokens: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rest = haystack;
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        if tokens.peek().is_none() {
            return rest.contains(token);
        }
        match find_followed_by_space(rest, token) {
            Some(resume) => rest = &rest[resume..],
            None => return false,
        }
    }
    true
}

/// Earliest occurrence of `token` that is followed by whitespace; returns the
/// byte offset just past that whitespace character.
fn find_followed_by_space(haystack: &str, token: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(token) {
        let start = from + offset;
        let end = start + token.len();
        match haystack[end..].chars().next() {
            Some(c) if c.is_whitespace() => return Some(end + c.len_utf8()),
            _ => from = start + step(haystack, start),
        }
    }
    None
}

/// A predicate over entry names.
///
/// Matchers borrow tokens already folded for the query's [`CaseMode`]; names
/// passed to [`Matcher::matches`] must be folded the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher<'a> {
    /// One token as a whole word.
    Word(&'a str),
    /// Two or more tokens in this relative order.
    Ordered(&'a [&'a str]),
}

impl<'a> Matcher<'a> {
    /// One token gives a [`Matcher::Word`], more give a [`Matcher::Ordered`].
    pub fn from_tokens(tokens: &'a [&'a str]) -> Option<Self> {
        match tokens {
            [] => None,
            [single] => Some(Matcher::Word(*single)),
            many => Some(Matcher::Ordered(many)),
        }
    }

    /// Number of tokens the matcher was built from; also its score.
    pub fn weight(&self) -> u32 {
        match self {
            Matcher::Word(_) => 1,
            Matcher::Ordered(tokens) => tokens.len() as u32,
        }
    }

    pub fn tokens(&self) -> &[&'a str] {
        match self {
            Matcher::Word(token) => std::slice::from_ref(token),
            Matcher::Ordered(tokens) => tokens,
        }
    }

    /// Evaluate against an already folded name.
    pub fn matches(&self, folded_name: &str) -> bool {
        match self {
            Matcher::Word(token) => contains_word(folded_name, token),
            Matcher::Ordered(tokens) => contains_in_order(folded_name, tokens.iter().copied()),
        }
    }
}

/// Expands keyword strings into [`PatternSet`]s.
#[derive(Debug, Clone, Copy)]
pub struct PatternGenerator {
    max_tokens: usize,
    case: CaseMode,
}

impl Default for PatternGenerator {
    fn default() -> Self {
        Self::new(SearchConfig::MAX_TOKENS, CaseMode::Insensitive)
    }
}

impl PatternGenerator {
    /// `max_tokens` is clamped to `1..=SearchConfig::MAX_TOKENS`.
    pub fn new(max_tokens: usize, case: CaseMode) -> Self {
        Self {
            max_tokens: max_tokens.clamp(1, SearchConfig::MAX_TOKENS),
            case,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.max_tokens,
            CaseMode::from_sensitive(config.case_sensitive),
        )
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Tokenize `keyword` and prepare its matchers. Tokens past the cap are
    /// dropped.
    pub fn generate(&self, keyword: &str) -> PatternSet {
        let all = tokenize(keyword);
        let kept = all.len().min(self.max_tokens);
        let tokens: Vec<String> = all[..kept]
            .iter()
            .map(|t| self.case.fold(t).into_owned())
            .collect();

        PatternSet {
            permutations: PermutationCache::new(tokens.len()),
            tokens,
            dropped: all.len() - kept,
            case: self.case,
        }
    }
}

/// The matchers generated for one query.
///
/// Holds the folded tokens and lazily built permutation tables; the full
/// matcher list is produced on demand by [`PatternSet::matchers`]. Scoring
/// walks the same tables directly over per-entry token subsets.
#[derive(Debug)]
pub struct PatternSet {
    tokens: Vec<String>,
    dropped: usize,
    case: CaseMode,
    permutations: PermutationCache,
}

impl PatternSet {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens cut off by the token cap.
    pub fn dropped_tokens(&self) -> usize {
        self.dropped
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case
    }

    /// Permutation table for `n` tokens, `n` up to the query's token count.
    pub fn permutations(&self, n: usize) -> Option<&PermutationTable> {
        self.permutations.get(n)
    }

    /// Total number of matchers in the set.
    pub fn matcher_count(&self) -> usize {
        let n = self.tokens.len();
        (1..=n).map(|k| permutation_count(n, k)).sum()
    }

    /// Visit every `(matcher, weight)` pair, ascending by weight.
    pub fn for_each_matcher(&self, mut visit: impl FnMut(Matcher<'_>, u32)) {
        let tokens: Vec<&str> = self.tokens.iter().map(String::as_str).collect();
        let Some(table) = self.permutations(tokens.len()) else {
            return;
        };

        let mut selected: Vec<&str> = Vec::with_capacity(tokens.len());
        for positions in table.from_len(1) {
            selected.clear();
            selected.extend(positions.iter().map(|&i| tokens[i as usize]));
            if let Some(matcher) = Matcher::from_tokens(&selected) {
                let weight = matcher.weight();
                visit(matcher, weight);
            }
        }
    }
}
