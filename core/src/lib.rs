//! In-process TF-IDF document search with sequential and parallel query
//! evaluation.

pub mod batch;
pub mod concurrent_map;
pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
pub mod paginator;
pub mod policy;
pub mod request_queue;
pub mod search;
pub mod tokenizer;

pub use config::SearchConfig;
pub use document::{Document, DocumentId, DocumentStatus};
pub use error::{Result, SearchError};
pub use index::SearchServer;
pub use policy::ExecutionPolicy;
pub use request_queue::RequestQueue;
pub use search::DocumentPredicate;

pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are ranked by rating.
pub const EPSILON: f64 = 1e-6;
