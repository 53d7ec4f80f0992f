use crate::DocId;

/// Errors raised while building an index.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The same document id was fed to the builder twice, or appears in two
    /// shards being merged.
    #[error("duplicate document id: {0}")]
    DuplicateDocument(DocId),
}
