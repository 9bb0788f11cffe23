use std::collections::VecDeque;

use crate::config::DEFAULT_HISTORY_WINDOW;
use crate::document::Document;
use crate::error::Result;
use crate::index::SearchServer;
use crate::policy::ExecutionPolicy;
use crate::search::DocumentPredicate;

/// Sliding window over the most recent search requests.
#[derive(Debug, Clone)]
pub struct RequestQueue {
    /// Hit count of each retained request, oldest first.
    requests: VecDeque<usize>,
    window: usize,
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl RequestQueue {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self { requests: VecDeque::with_capacity(window), window }
    }

    /// Run the query and record it. Failed queries are not recorded.
    pub fn add_find_request<P: DocumentPredicate>(
        &mut self,
        server: &SearchServer,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>> {
        let found = server.find_top_documents_by(ExecutionPolicy::Sequential, raw_query, predicate)?;
        self.record(&found);
        Ok(found)
    }

    pub fn record(&mut self, found: &[Document]) {
        if self.requests.len() == self.window {
            self.requests.pop_front();
        }
        self.requests.push_back(found.len());
    }

    pub fn no_result_requests(&self) -> usize {
        self.requests.iter().filter(|&&hits| hits == 0).count()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
