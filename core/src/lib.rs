//! Vector-space retrieval: an inverted index with lnc document weights, ltc
//! query weights, cosine-style ranking and a Soundex fallback for query terms
//! the corpus never uses.

pub mod error;
pub mod export;
pub mod index;
pub mod persist;
pub mod query;
pub mod rank;
pub mod soundex;
pub mod tokenizer;

pub use error::IndexError;
pub use export::{export_postings, parse_postings, PostingsSink, PostingsWriter, TermPostings};
pub use index::{build_index, build_index_parallel, Dictionary, DocId, DocumentLengths, IndexBuilder, InvertedIndex, Posting};
pub use query::QueryVector;
pub use rank::{rank, search, SearchHit, SearchOptions, DEFAULT_TOP_K};
