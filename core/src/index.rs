use crate::soundex::soundex;
use crate::tokenizer::tokenize;
use crate::IndexError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type DocId = String;

/// term -> postings, in document-processing order
pub type Dictionary = HashMap<String, Vec<Posting>>;

/// doc id -> Euclidean norm of the document's log-tf vector
pub type DocumentLengths = HashMap<DocId, f64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

impl Posting {
    /// `1 + log10(tf)`, the logarithmic tf weight shared by documents and queries.
    pub fn log_weight(&self) -> f64 {
        log_tf(self.term_frequency)
    }
}

pub(crate) fn log_tf(tf: u32) -> f64 {
    if tf > 0 { 1.0 + (tf as f64).log10() } else { 0.0 }
}

/// Accumulates documents before length normalization.
///
/// Builders can be filled independently and combined with [`IndexBuilder::merge`],
/// which is how [`build_index_parallel`] shards the corpus.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    dictionary: Dictionary,
    doc_lengths: DocumentLengths,
    num_docs: u32,
}

impl IndexBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    /// Tokenize `text` and append one posting per distinct term.
    ///
    /// Documents without tokens still count towards N and get a zero length.
    pub fn add_document(&mut self, doc_id: impl Into<DocId>, text: &str) -> Result<(), IndexError> {
        let doc_id = doc_id.into();
        if self.doc_lengths.contains_key(&doc_id) {
            return Err(IndexError::DuplicateDocument(doc_id));
        }

        let mut tf_counts: HashMap<String, u32> = HashMap::new();
        for term in tokenize(text) {
            *tf_counts.entry(term).or_insert(0) += 1;
        }
        for (term, term_frequency) in tf_counts {
            self.dictionary
                .entry(term)
                .or_default()
                .push(Posting { doc_id: doc_id.clone(), term_frequency });
        }

        self.doc_lengths.insert(doc_id, 0.0);
        self.num_docs += 1;
        Ok(())
    }

    /// Append another builder's documents after this one's.
    ///
    /// Fails without modifying `self` if the two share a document id.
    pub fn merge(&mut self, other: IndexBuilder) -> Result<(), IndexError> {
        if let Some(dup) = other.doc_lengths.keys().find(|id| self.doc_lengths.contains_key(*id)) {
            return Err(IndexError::DuplicateDocument(dup.clone()));
        }
        for (term, postings) in other.dictionary {
            self.dictionary.entry(term).or_default().extend(postings);
        }
        self.doc_lengths.extend(other.doc_lengths);
        self.num_docs += other.num_docs;
        Ok(())
    }

    /// Compute document lengths and the phonetic table, freezing the index.
    pub fn finish(self) -> InvertedIndex {
        let IndexBuilder { dictionary, mut doc_lengths, num_docs } = self;

        // Fixed term order keeps the floating-point sums independent of hash order.
        let mut terms: Vec<&String> = dictionary.keys().collect();
        terms.sort_unstable();

        for term in &terms {
            for posting in &dictionary[*term] {
                let w = posting.log_weight();
                if let Some(len) = doc_lengths.get_mut(&posting.doc_id) {
                    *len += w * w;
                }
            }
        }
        for len in doc_lengths.values_mut() {
            *len = len.sqrt();
        }

        // Buckets come out sorted because `terms` is.
        let mut phonetic: HashMap<String, Vec<String>> = HashMap::new();
        for term in &terms {
            if let Some(code) = soundex(term) {
                phonetic.entry(code).or_default().push((*term).clone());
            }
        }

        tracing::info!(num_docs, num_terms = dictionary.len(), phonetic_codes = phonetic.len(), "index built");
        InvertedIndex { dictionary, doc_lengths, num_docs, phonetic }
    }
}

/// Build an index from `(doc_id, text)` pairs in order.
pub fn build_index<I, S, T>(docs: I) -> Result<InvertedIndex, IndexError>
where
    I: IntoIterator<Item = (S, T)>,
    S: Into<DocId>,
    T: AsRef<str>,
{
    let mut builder = IndexBuilder::new();
    for (doc_id, text) in docs {
        builder.add_document(doc_id, text.as_ref())?;
    }
    Ok(builder.finish())
}

/// Build an index with one builder per rayon shard, merged before normalization.
///
/// Scores match [`build_index`] over the same documents; only the order of
/// postings inside a term may differ.
pub fn build_index_parallel<S, T>(docs: &[(S, T)]) -> Result<InvertedIndex, IndexError>
where
    S: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
{
    docs.par_iter()
        .try_fold(IndexBuilder::new, |mut builder, (doc_id, text)| -> Result<IndexBuilder, IndexError> {
            builder.add_document(doc_id.as_ref(), text.as_ref())?;
            Ok(builder)
        })
        .try_reduce(IndexBuilder::new, |mut left, right| -> Result<IndexBuilder, IndexError> {
            left.merge(right)?;
            Ok(left)
        })
        .map(IndexBuilder::finish)
}

/// Immutable inverted index with per-document lengths and a Soundex lookup table.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InvertedIndex {
    dictionary: Dictionary,
    doc_lengths: DocumentLengths,
    num_docs: u32,
    /// soundex code -> dictionary terms sharing it, sorted
    phonetic: HashMap<String, Vec<String>>,
}

impl InvertedIndex {
    pub fn dictionary(&self) -> &Dictionary { &self.dictionary }

    pub fn doc_lengths(&self) -> &DocumentLengths { &self.doc_lengths }

    /// Number of documents processed, N.
    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn num_terms(&self) -> usize { self.dictionary.len() }

    pub fn contains_term(&self, term: &str) -> bool { self.dictionary.contains_key(term) }

    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.dictionary.get(term).map(Vec::as_slice)
    }

    /// Number of documents containing `term`; 0 when absent.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.dictionary.get(term).map_or(0, Vec::len)
    }

    pub fn doc_length(&self, doc_id: &str) -> Option<f64> {
        self.doc_lengths.get(doc_id).copied()
    }

    /// Dictionary terms whose Soundex code is `code`.
    pub fn phonetic_matches(&self, code: &str) -> &[String] {
        self.phonetic.get(code).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every term with its postings, sorted by term.
    pub fn sorted_terms(&self) -> Vec<(&str, &[Posting])> {
        let mut entries: Vec<(&str, &[Posting])> = self
            .dictionary
            .iter()
            .map(|(term, postings)| (term.as_str(), postings.as_slice()))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
