use crate::DocumentId;
use thiserror::Error;

/// Errors reported by the search engine. Every failure is detected before the
/// index is mutated or a query is scored, so the engine stays usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("document id {0} is negative")]
    InvalidId(DocumentId),

    #[error("document id {0} already exists")]
    DuplicateId(DocumentId),

    #[error("word {0:?} contains control characters")]
    InvalidContent(String),

    #[error("malformed minus word {0:?}")]
    MalformedMinus(String),

    #[error("document {0} not found")]
    NotFound(DocumentId),

    #[error("document position {position} is out of range (document count {count})")]
    PositionOutOfRange { position: usize, count: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
