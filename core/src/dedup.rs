use std::collections::{BTreeSet, HashSet};

use tracing::info;

use crate::document::DocumentId;
use crate::index::SearchServer;

/// Ids of documents whose distinct word set equals that of a lower id.
pub fn find_duplicates(server: &SearchServer) -> Vec<DocumentId> {
    let mut seen: HashSet<BTreeSet<&str>> = HashSet::new();
    let mut duplicates = Vec::new();
    for (&id, words) in &server.document_to_word_freqs {
        let word_set: BTreeSet<&str> = words.keys().map(String::as_str).collect();
        if !seen.insert(word_set) {
            duplicates.push(id);
        }
    }
    duplicates
}

/// Remove every duplicate found by [`find_duplicates`], after the scan
/// completes. Returns the removed ids in ascending order.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocumentId> {
    let duplicates = find_duplicates(server);
    for &id in &duplicates {
        info!(document_id = id, "found duplicate document id");
        server.remove_document(id);
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocumentStatus;

    #[test]
    fn keeps_lowest_id_of_each_group() {
        let mut server = SearchServer::new("and with").unwrap();
        let docs = [
            (1, "funny pet and nasty rat"),
            (2, "funny pet with curly hair"),
            (3, "funny pet with curly hair"),
            (4, "funny pet and curly hair"),
            (5, "funny funny pet and nasty nasty rat"),
            (6, "funny pet and not very nasty rat"),
            (7, "very nasty rat and not very funny pet"),
            (8, "pet with rat and rat and rat"),
            (9, "nasty rat with curly hair"),
        ];
        for (id, text) in docs {
            server.add_document(id, text, DocumentStatus::Actual, &[1, 2]).unwrap();
        }
        assert_eq!(server.document_count(), 9);
        assert_eq!(remove_duplicates(&mut server), vec![3, 4, 5, 7]);
        assert_eq!(server.document_count(), 5);
        assert_eq!(server.document_ids().collect::<Vec<_>>(), vec![1, 2, 6, 8, 9]);
    }

    #[test]
    fn stop_word_only_documents_are_duplicates_of_each_other() {
        let mut server = SearchServer::new("and with").unwrap();
        server.add_document(10, "and", DocumentStatus::Actual, &[]).unwrap();
        server.add_document(4, "with and", DocumentStatus::Actual, &[]).unwrap();
        assert_eq!(remove_duplicates(&mut server), vec![10]);
    }

    #[test]
    fn no_duplicates_is_a_noop() {
        let mut server = SearchServer::new("").unwrap();
        server.add_document(1, "a b", DocumentStatus::Actual, &[]).unwrap();
        server.add_document(2, "a c", DocumentStatus::Actual, &[]).unwrap();
        assert!(remove_duplicates(&mut server).is_empty());
        assert_eq!(server.document_count(), 2);
    }
}
