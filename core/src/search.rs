use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::concurrent_map::ConcurrentMap;
use crate::document::{Document, DocumentId, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::index::SearchServer;
use crate::policy::ExecutionPolicy;
use crate::tokenizer::{parse_query, ParsedQuery};
use crate::EPSILON;

/// Filter applied to every scored document before ranking.
pub trait DocumentPredicate: Sync {
    fn matches(&self, id: DocumentId, status: DocumentStatus, rating: i32) -> bool;
}

impl<F> DocumentPredicate for F
where
    F: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
{
    fn matches(&self, id: DocumentId, status: DocumentStatus, rating: i32) -> bool {
        self(id, status, rating)
    }
}

impl DocumentPredicate for DocumentStatus {
    fn matches(&self, _id: DocumentId, status: DocumentStatus, _rating: i32) -> bool {
        *self == status
    }
}

/// Relevance descending; relevances closer than `EPSILON` fall back to rating
/// descending.
pub fn compare_documents(lhs: &Document, rhs: &Document) -> Ordering {
    if (lhs.relevance - rhs.relevance).abs() < EPSILON {
        rhs.rating.cmp(&lhs.rating)
    } else if lhs.relevance > rhs.relevance {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

impl SearchServer {
    /// Top documents with status `Actual`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by(ExecutionPolicy::Sequential, raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_with<F>(&self, raw_query: &str, predicate: F) -> Result<Vec<Document>>
    where
        F: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_by(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    pub fn find_top_documents_by<P: DocumentPredicate>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>> {
        let query = parse_query(raw_query, &self.stop_words, true)?;
        let mut matched = self.find_all_documents(policy, &query, &predicate);
        policy.sort_by(&mut matched, compare_documents);
        matched.truncate(self.max_results);
        debug!(query = raw_query, ?policy, hits = matched.len(), "query evaluated");
        Ok(matched)
    }

    fn find_all_documents<P: DocumentPredicate>(
        &self,
        policy: ExecutionPolicy,
        query: &ParsedQuery<'_>,
        predicate: &P,
    ) -> Vec<Document> {
        let relevance = self.compute_relevance(policy, query);
        let scored: Vec<Document> = relevance
            .into_iter()
            .filter_map(|(id, relevance)| {
                let data = self.documents.get(&id)?;
                Some(Document { id, relevance, rating: data.rating, status: data.status })
            })
            .collect();
        policy.filter(scored, |doc| predicate.matches(doc.id, doc.status, doc.rating))
    }

    /// Accumulate IDF x TF over plus words, then drop every document holding a
    /// minus word. The minus stage starts only after all plus words are done.
    fn compute_relevance(&self, policy: ExecutionPolicy, query: &ParsedQuery<'_>) -> BTreeMap<DocumentId, f64> {
        let bucket_count = match policy {
            ExecutionPolicy::Sequential => 1,
            ExecutionPolicy::Parallel => self.bucket_count,
        };
        let relevance: ConcurrentMap<DocumentId, f64> = ConcurrentMap::new(bucket_count);

        policy.for_each(&query.plus_words, |word| {
            let Some(postings) = self.word_to_document_freqs.get(*word) else {
                return;
            };
            let idf = self.inverse_document_freq(postings);
            for (&id, &tf) in postings {
                relevance.increment(id, idf * tf);
            }
        });

        policy.for_each(&query.minus_words, |word| {
            if let Some(postings) = self.word_to_document_freqs.get(*word) {
                let ids: Vec<DocumentId> = postings.keys().copied().collect();
                policy.for_each(&ids, |id| relevance.erase(*id));
            }
        });

        relevance.drain()
    }

    pub fn match_document(&self, raw_query: &str, document_id: DocumentId) -> Result<(Vec<String>, DocumentStatus)> {
        self.match_document_with(ExecutionPolicy::Sequential, raw_query, document_id)
    }

    /// Plus words of the query found in the document, sorted and unique. Empty
    /// when the document holds any minus word.
    pub fn match_document_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let words = self
            .document_to_word_freqs
            .get(&document_id)
            .ok_or(SearchError::NotFound(document_id))?;
        // Both maps hold the same ids.
        let status = self.documents[&document_id].status;
        let query = parse_query(raw_query, &self.stop_words, false)?;

        if policy.any(&query.minus_words, |word| words.contains_key(*word)) {
            return Ok((Vec::new(), status));
        }

        let mut matched = policy.filter(query.plus_words, |word| words.contains_key(*word));
        matched.sort_unstable();
        matched.dedup();
        Ok((matched.into_iter().map(str::to_string).collect(), status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: DocumentId, relevance: f64, rating: i32) -> Document {
        Document { id, relevance, rating, status: DocumentStatus::Actual }
    }

    #[test]
    fn near_equal_relevance_ranks_by_rating() {
        let a = doc(1, 0.5, 1);
        let b = doc(2, 0.5 + 1e-7, 9);
        assert_eq!(compare_documents(&a, &b), Ordering::Greater);
        assert_eq!(compare_documents(&b, &a), Ordering::Less);
    }

    #[test]
    fn relevance_dominates_outside_epsilon() {
        let a = doc(1, 0.5, 1);
        let b = doc(2, 0.4, 9);
        assert_eq!(compare_documents(&a, &b), Ordering::Less);
    }

    #[test]
    fn status_predicate() {
        assert!(DocumentStatus::Banned.matches(1, DocumentStatus::Banned, 0));
        assert!(!DocumentStatus::Banned.matches(1, DocumentStatus::Actual, 0));
    }

    #[test]
    fn match_checks_presence_before_parsing() {
        let s = SearchServer::new("").unwrap();
        assert_eq!(s.match_document("--bad", 3), Err(SearchError::NotFound(3)));
    }

    #[test]
    fn match_after_removal_is_not_found() {
        let mut s = SearchServer::new("").unwrap();
        s.add_document(1, "cat dog", DocumentStatus::Actual, &[1]).unwrap();
        s.add_document(2, "", DocumentStatus::Irrelevant, &[]).unwrap();
        assert_eq!(s.match_document("cat", 2), Ok((Vec::new(), DocumentStatus::Irrelevant)));
        s.remove_document(1);
        for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
            assert_eq!(s.match_document_with(policy, "cat", 1), Err(SearchError::NotFound(1)));
        }
    }

    #[test]
    fn match_dedupes_plus_words() {
        let mut s = SearchServer::new("").unwrap();
        s.add_document(1, "cat dog", DocumentStatus::Banned, &[1]).unwrap();
        for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
            let (words, status) = s.match_document_with(policy, "dog cat dog bird", 1).unwrap();
            assert_eq!(words, vec!["cat", "dog"]);
            assert_eq!(status, DocumentStatus::Banned);
        }
    }
}
