//! Few-shot example selection.
//!
//! Two strategies share one entry point:
//!
//! - [`Selection::Fixed`] hands back the whole corpus in declared order.
//! - [`Selection::Ranked`] scores each example by word overlap with the
//!   statement and keeps the top `k`.
//!
//! # Scoring
//!
//! Both texts are lowercased and split on whitespace into token *sets*; the
//! score is the size of their intersection. Punctuation is not stripped, so
//! `"age."` and `"age"` are different tokens. Ties keep corpus order.

use std::collections::HashSet;

use crate::corpus::{Corpus, Example};

/// Number of examples returned by ranked selection unless configured otherwise.
pub const DEFAULT_K: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Use every example, unranked.
    Fixed,
    /// Rank by word overlap and keep the best `k`.
    Ranked { k: usize },
}

impl Default for Selection {
    fn default() -> Self {
        Self::Ranked { k: DEFAULT_K }
    }
}

impl Selection {
    /// Pick the examples to show the generator for `statement`.
    pub fn apply<'a>(&self, statement: &str, corpus: &'a Corpus) -> Vec<&'a Example> {
        match *self {
            Self::Fixed => corpus.examples().iter().collect(),
            Self::Ranked { k } => select(statement, corpus.examples(), k),
        }
    }

    /// Like [`apply`](Self::apply) but keeps the overlap score of each pick.
    ///
    /// Fixed selection still reports scores; they just don't affect order.
    pub fn apply_scored<'a>(&self, statement: &str, corpus: &'a Corpus) -> Vec<ScoredExample<'a>> {
        match *self {
            Self::Fixed => {
                let keywords = tokenize(statement);
                corpus
                    .examples()
                    .iter()
                    .map(|example| ScoredExample {
                        score: intersection(&keywords, &example.input),
                        example,
                    })
                    .collect()
            }
            Self::Ranked { k } => rank(statement, corpus.examples(), k),
        }
    }
}

/// An example together with its overlap score against a statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredExample<'a> {
    pub score: usize,
    pub example: &'a Example,
}

/// Lowercased, whitespace-separated token set.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of distinct tokens shared by `a` and `b`.
pub fn overlap_score(a: &str, b: &str) -> usize {
    intersection(&tokenize(a), b)
}

/// Return the `k` examples sharing the most words with `statement`.
///
/// Low or zero-scoring examples still fill the result when nothing better
/// exists; only an empty corpus (or `k == 0`) yields an empty result.
pub fn select<'a>(statement: &str, corpus: &'a [Example], k: usize) -> Vec<&'a Example> {
    rank(statement, corpus, k)
        .into_iter()
        .map(|s| s.example)
        .collect()
}

fn rank<'a>(statement: &str, corpus: &'a [Example], k: usize) -> Vec<ScoredExample<'a>> {
    let keywords = tokenize(statement);
    let mut scored: Vec<ScoredExample<'a>> = corpus
        .iter()
        .map(|example| ScoredExample {
            score: intersection(&keywords, &example.input),
            example,
        })
        .collect();

    // sort_by is stable: equal scores stay in corpus order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(k);
    scored
}

fn intersection(keywords: &HashSet<String>, text: &str) -> usize {
    tokenize(text)
        .iter()
        .filter(|t| keywords.contains(*t))
        .count()
}
