use crate::DocId;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("term must normalize to a single token: {term:?} produced {tokens:?}")]
    InvalidTerm { term: String, tokens: Vec<String> },

    #[error("document {0} is not indexed")]
    UnknownDocument(DocId),

    #[error("{artifact} not found at {}", path.display())]
    MissingArtifact { artifact: &'static str, path: PathBuf },

    #[error("cannot build an index from an empty document collection")]
    EmptyCorpus,

    #[error("document id {0} appears more than once in the collection")]
    DuplicateDocument(DocId),

    #[error("{0} documents exceed the snapshot limit")]
    TooManyDocuments(usize),

    #[error("index snapshot is corrupt: {0}")]
    CorruptSnapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("timestamp error: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl Error {
    /// True when the cache has never been built, as opposed to being unreadable.
    pub fn is_missing_index(&self) -> bool {
        matches!(self, Error::MissingArtifact { .. })
    }
}
