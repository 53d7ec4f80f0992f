use crate::soundex::soundex;
use crate::{DocId, InvertedIndex, Posting, QueryVector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub top_k: usize,
    /// Expand out-of-vocabulary query terms through Soundex matches.
    pub phonetic_fallback: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K, phonetic_fallback: true }
    }
}

impl SearchOptions {
    pub fn with_top_k(top_k: usize) -> Self {
        Self { top_k, ..Self::default() }
    }
}

/// Score documents against `query` and return the best `top_k`.
///
/// Ordered by score descending, then doc id ascending. Documents with zero
/// length or zero score never appear.
pub fn rank(query: &QueryVector, index: &InvertedIndex, top_k: usize) -> Vec<SearchHit> {
    let mut scores: HashMap<&str, f64> = HashMap::new();

    for (term, wq) in query.terms() {
        if let Some(postings) = index.postings(term) {
            accumulate(&mut scores, index, postings, wq);
        }
    }

    // Every dictionary term sharing the code contributes in full.
    for (term, wq) in query.fallback_terms() {
        let Some(code) = soundex(term) else { continue };
        for substitute in index.phonetic_matches(&code) {
            if let Some(postings) = index.postings(substitute) {
                accumulate(&mut scores, index, postings, wq);
            }
        }
    }

    let mut hits: Vec<SearchHit> = scores
        .into_iter()
        .filter(|(_, score)| score.is_finite() && *score > 0.0)
        .map(|(doc_id, score)| SearchHit { doc_id: doc_id.to_string(), score })
        .collect();

    hits.sort_unstable_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.doc_id.cmp(&b.doc_id)));
    hits.truncate(top_k);
    hits
}

fn accumulate<'a>(scores: &mut HashMap<&'a str, f64>, index: &InvertedIndex, postings: &'a [Posting], wq: f64) {
    for posting in postings {
        let len = index.doc_length(&posting.doc_id).unwrap_or(0.0);
        if len == 0.0 {
            continue;
        }
        *scores.entry(posting.doc_id.as_str()).or_insert(0.0) += wq * posting.log_weight() / len;
    }
}

/// Tokenize `query`, weight it against `index`, and rank.
pub fn search(index: &InvertedIndex, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
    let qv = QueryVector::build_with(query, index, options.phonetic_fallback);
    let hits = rank(&qv, index, options.top_k);
    tracing::debug!(query, terms = qv.len(), hits = hits.len(), "search");
    hits
}
