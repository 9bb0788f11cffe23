use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use tracing::debug;

use crate::config::SearchConfig;
use crate::document::{compute_average_rating, DocumentData, DocumentId, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::policy::ExecutionPolicy;
use crate::tokenizer::StopWords;

/// In-memory inverted index with TF-IDF ranking.
///
/// Postings are kept in both directions: `word_to_document_freqs` drives
/// scoring and `document_to_word_freqs` drives removal, frequency lookups and
/// deduplication. Mutations take `&mut self`, so a reader behind a shared
/// lock sees a document either fully indexed or fully gone.
#[derive(Debug, Clone)]
pub struct SearchServer {
    pub(crate) stop_words: StopWords,
    pub(crate) documents: BTreeMap<DocumentId, DocumentData>,
    pub(crate) word_to_document_freqs: HashMap<String, BTreeMap<DocumentId, f64>>,
    pub(crate) document_to_word_freqs: BTreeMap<DocumentId, BTreeMap<String, f64>>,
    insertion_order: Vec<DocumentId>,
    pub(crate) max_results: usize,
    pub(crate) bucket_count: usize,
}

impl SearchServer {
    /// Build a server whose stop words are the space-separated words of `stop_words`.
    pub fn new(stop_words: &str) -> Result<Self> {
        Self::from_parts(StopWords::from_text(stop_words)?, &SearchConfig::default())
    }

    pub fn from_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_parts(StopWords::new(stop_words)?, &SearchConfig::default())
    }

    pub fn with_config(config: &SearchConfig) -> Result<Self> {
        Self::from_parts(StopWords::new(&config.stop_words)?, config)
    }

    fn from_parts(stop_words: StopWords, config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            stop_words,
            documents: BTreeMap::new(),
            word_to_document_freqs: HashMap::new(),
            document_to_word_freqs: BTreeMap::new(),
            insertion_order: Vec::new(),
            max_results: config.max_results,
            bucket_count: config.bucket_count(),
        })
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    pub fn add_document(
        &mut self,
        document_id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if document_id < 0 {
            return Err(SearchError::InvalidId(document_id));
        }
        if self.documents.contains_key(&document_id) {
            return Err(SearchError::DuplicateId(document_id));
        }
        let words = self.stop_words.split_no_stop(text)?;

        let mut word_freqs: BTreeMap<String, f64> = BTreeMap::new();
        if !words.is_empty() {
            let tf_single = 1.0 / words.len() as f64;
            for word in &words {
                *word_freqs.entry((*word).to_string()).or_insert(0.0) += tf_single;
            }
        }
        for (word, tf) in &word_freqs {
            self.word_to_document_freqs
                .entry(word.clone())
                .or_default()
                .insert(document_id, *tf);
        }
        self.document_to_word_freqs.insert(document_id, word_freqs);
        self.documents.insert(
            document_id,
            DocumentData { rating: compute_average_rating(ratings), status },
        );
        self.insertion_order.push(document_id);
        debug!(document_id, words = words.len(), %status, "document added");
        Ok(())
    }

    pub fn remove_document(&mut self, document_id: DocumentId) {
        self.remove_document_with(ExecutionPolicy::Sequential, document_id);
    }

    /// Remove a document from every index structure. Absent ids are ignored.
    pub fn remove_document_with(&mut self, policy: ExecutionPolicy, document_id: DocumentId) {
        let Some(word_freqs) = self.document_to_word_freqs.remove(&document_id) else {
            return;
        };
        match policy {
            ExecutionPolicy::Sequential => {
                for word in word_freqs.keys() {
                    let Some(docs) = self.word_to_document_freqs.get_mut(word) else {
                        continue;
                    };
                    docs.remove(&document_id);
                    if docs.is_empty() {
                        self.word_to_document_freqs.remove(word);
                    }
                }
            }
            ExecutionPolicy::Parallel => {
                let mut lists: Vec<(String, BTreeMap<DocumentId, f64>)> = word_freqs
                    .into_keys()
                    .filter_map(|word| {
                        let docs = self.word_to_document_freqs.remove(&word)?;
                        Some((word, docs))
                    })
                    .collect();
                lists.par_iter_mut().for_each(|(_, docs)| {
                    docs.remove(&document_id);
                });
                self.word_to_document_freqs
                    .extend(lists.into_iter().filter(|(_, docs)| !docs.is_empty()));
            }
        }
        self.documents.remove(&document_id);
        self.insertion_order.retain(|&id| id != document_id);
        debug!(document_id, "document removed");
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Id of the `position`-th live document in insertion order.
    pub fn document_id_at(&self, position: usize) -> Result<DocumentId> {
        self.insertion_order
            .get(position)
            .copied()
            .ok_or(SearchError::PositionOutOfRange { position, count: self.insertion_order.len() })
    }

    pub fn word_frequencies(&self, document_id: DocumentId) -> Result<&BTreeMap<String, f64>> {
        self.document_to_word_freqs
            .get(&document_id)
            .ok_or(SearchError::NotFound(document_id))
    }

    pub fn document_data(&self, document_id: DocumentId) -> Option<&DocumentData> {
        self.documents.get(&document_id)
    }

    pub fn contains(&self, document_id: DocumentId) -> bool {
        self.documents.contains_key(&document_id)
    }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.documents.keys().copied()
    }

    pub(crate) fn inverse_document_freq(&self, postings: &BTreeMap<DocumentId, f64>) -> f64 {
        (self.document_count() as f64 / postings.len() as f64).ln()
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocumentId;
    type IntoIter = std::iter::Copied<std::collections::btree_map::Keys<'a, DocumentId, DocumentData>>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.keys().copied()
    }
}
