use crate::index::log_tf;
use crate::soundex::soundex;
use crate::tokenizer::tokenize;
use crate::InvertedIndex;
use std::collections::{BTreeMap, HashSet};

/// `log10(N / df)`; 0 for a term no document contains.
pub fn idf(num_docs: u32, df: usize) -> f64 {
    if df == 0 {
        return 0.0;
    }
    (num_docs as f64 / df as f64).log10()
}

/// Weighted query terms (ltc), unit-normalized unless every weight is zero.
///
/// `terms` holds query terms found in the dictionary. `fallback` holds terms
/// the dictionary lacks but whose Soundex code matches at least one
/// dictionary term; the ranker expands those at scoring time. Both maps are
/// normalized together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryVector {
    terms: BTreeMap<String, f64>,
    fallback: BTreeMap<String, f64>,
}

impl QueryVector {
    pub fn build(query: &str, index: &InvertedIndex) -> Self {
        Self::build_with(query, index, true)
    }

    /// Like [`QueryVector::build`], with phonetic fallback optionally disabled.
    pub fn build_with(query: &str, index: &InvertedIndex, phonetic_fallback: bool) -> Self {
        let mut tf_q: BTreeMap<String, u32> = BTreeMap::new();
        for term in tokenize(query) {
            *tf_q.entry(term).or_insert(0) += 1;
        }

        let n = index.num_docs();
        let mut terms = BTreeMap::new();
        let mut fallback = BTreeMap::new();
        for (term, tf) in tf_q {
            let df = index.document_frequency(&term);
            if df > 0 {
                let w = log_tf(tf) * idf(n, df);
                terms.insert(term, w);
            } else if phonetic_fallback {
                let df = fallback_document_frequency(index, &term);
                if df > 0 {
                    let w = log_tf(tf) * idf(n, df);
                    fallback.insert(term, w);
                }
            }
        }

        let mut qv = QueryVector { terms, fallback };
        let norm = qv.norm();
        if norm > 0.0 {
            for w in qv.terms.values_mut().chain(qv.fallback.values_mut()) {
                *w /= norm;
            }
        }
        tracing::debug!(known = qv.terms.len(), fallback = qv.fallback.len(), "query vector built");
        qv
    }

    /// Dictionary terms and their weights, sorted by term.
    pub fn terms(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.terms.iter().map(|(t, w)| (t.as_str(), *w))
    }

    /// Out-of-vocabulary terms to expand phonetically, sorted by term.
    pub fn fallback_terms(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.fallback.iter().map(|(t, w)| (t.as_str(), *w))
    }

    pub fn weight(&self, term: &str) -> Option<f64> {
        self.terms.get(term).or_else(|| self.fallback.get(term)).copied()
    }

    pub fn len(&self) -> usize {
        self.terms.len() + self.fallback.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Euclidean norm over all weights.
    pub fn norm(&self) -> f64 {
        self.terms
            .values()
            .chain(self.fallback.values())
            .map(|w| w * w)
            .sum::<f64>()
            .sqrt()
    }
}

/// Distinct documents reachable through `term`'s phonetic matches.
fn fallback_document_frequency(index: &InvertedIndex, term: &str) -> usize {
    let Some(code) = soundex(term) else { return 0 };
    let mut docs: HashSet<&str> = HashSet::new();
    for matched in index.phonetic_matches(&code) {
        for posting in index.postings(matched).unwrap_or_default() {
            docs.insert(&posting.doc_id);
        }
    }
    docs.len()
}
