use search_core::{Document, DocumentStatus, ExecutionPolicy, SearchError, SearchServer};

const POLICIES: [ExecutionPolicy; 2] = [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel];

fn ids(docs: &[Document]) -> Vec<i32> {
    docs.iter().map(|d| d.id).collect()
}

#[test]
fn stop_words_are_excluded_from_documents() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(42, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    assert_eq!(ids(&server.find_top_documents("in").unwrap()), vec![42]);

    let mut server = SearchServer::new("in the").unwrap();
    server.add_document(42, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    assert!(server.find_top_documents("in").unwrap().is_empty());
    assert!(server.find_top_documents("in the").unwrap().is_empty());
    let (words, _) = server.match_document("in the", 42).unwrap();
    assert!(words.is_empty());
}

#[test]
fn add_then_remove_changes_count_by_one() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(1, "a b", DocumentStatus::Actual, &[1]).unwrap();
    server.add_document(2, "b c", DocumentStatus::Actual, &[1]).unwrap();
    assert_eq!(server.document_count(), 2);
    server.remove_document(2);
    assert_eq!(server.document_count(), 1);
    assert_eq!(server.match_document("b", 2), Err(SearchError::NotFound(2)));
    server.remove_document(2);
    assert_eq!(server.document_count(), 1);
    assert_eq!(ids(&server.find_top_documents("b").unwrap()), vec![1]);
}

#[test]
fn minus_words_exclude_documents() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(13, "dog in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    for policy in POLICIES {
        for query in ["-dog in the city", "dog -in the city", "dog in -the city", "dog in the -city"] {
            let found = server.find_top_documents_by(policy, query, DocumentStatus::Actual).unwrap();
            assert!(found.is_empty(), "{query} with {policy:?}");
        }
    }
}

#[test]
fn malformed_queries_fail_without_results() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(1, "cat in the city", DocumentStatus::Actual, &[1]).unwrap();
    for query in ["cat -", "cat --city", "-- cat"] {
        assert!(matches!(server.find_top_documents(query), Err(SearchError::MalformedMinus(_))));
        assert!(matches!(server.match_document(query, 1), Err(SearchError::MalformedMinus(_))));
    }
    assert!(matches!(server.find_top_documents("c\x01at"), Err(SearchError::InvalidContent(_))));
    // still usable afterwards
    assert_eq!(server.find_top_documents("cat").unwrap().len(), 1);
}

#[test]
fn match_document_lists_sorted_plus_words() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(13, "cat in the city", DocumentStatus::Irrelevant, &[1, 2, 3]).unwrap();
    for policy in POLICIES {
        let (words, status) = server.match_document_with(policy, "the in cat", 13).unwrap();
        assert_eq!(words, vec!["cat", "in", "the"]);
        assert_eq!(status, DocumentStatus::Irrelevant);
        let (words, _) = server.match_document_with(policy, "the in -cat", 13).unwrap();
        assert!(words.is_empty());
    }
}

#[test]
fn equal_relevance_keeps_ascending_id_order() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(13, "cat cat cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    server.add_document(4, "cat cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    server.add_document(7, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    for policy in POLICIES {
        for _ in 0..5 {
            let found = server.find_top_documents_by(policy, "cat", DocumentStatus::Actual).unwrap();
            assert_eq!(ids(&found), vec![4, 7, 13]);
        }
    }
}

#[test]
fn rating_is_truncated_average() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(13, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    assert_eq!(server.find_top_documents("city").unwrap()[0].rating, 2);
}

#[test]
fn predicate_filters_by_id_status_and_rating() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(13, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    server.add_document(4, "dog in the city", DocumentStatus::Banned, &[2, 3, 3]).unwrap();
    server.add_document(6, "people in the city", DocumentStatus::Irrelevant, &[4, 7, 4]).unwrap();

    let banned = server.find_top_documents_with("city", |_, status, _| status == DocumentStatus::Banned).unwrap();
    assert_eq!(ids(&banned), vec![4]);
    let by_id = server.find_top_documents_with("city", |id, _, _| id == 13).unwrap();
    assert_eq!(ids(&by_id), vec![13]);
    let by_rating = server.find_top_documents_with("city", |_, _, rating| rating == 5).unwrap();
    assert_eq!(ids(&by_rating), vec![6]);
}

#[test]
fn status_filter_selects_each_status() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(13, "cat in the city", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
    server.add_document(4, "dog in the city", DocumentStatus::Banned, &[1, 2, 3]).unwrap();
    server.add_document(7, "duck in the city", DocumentStatus::Irrelevant, &[1, 2, 3]).unwrap();
    server.add_document(666, "bear in the city", DocumentStatus::Removed, &[1, 2, 3]).unwrap();
    let cases = [
        (DocumentStatus::Actual, 13),
        (DocumentStatus::Banned, 4),
        (DocumentStatus::Irrelevant, 7),
        (DocumentStatus::Removed, 666),
    ];
    for policy in POLICIES {
        for (status, id) in cases {
            assert_eq!(ids(&server.find_top_documents_by(policy, "city", status).unwrap()), vec![id]);
        }
    }
    assert_eq!(ids(&server.find_top_documents("city").unwrap()), vec![13]);
}

#[test]
fn relevance_is_idf_times_tf() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(13, "белый кот и модный ошейник", DocumentStatus::Actual, &[8, -3]).unwrap();
    server.add_document(4, "пушистый кот пушистый хвост", DocumentStatus::Actual, &[7, 2, 7]).unwrap();
    for policy in POLICIES {
        let found = server
            .find_top_documents_by(policy, "пушистый ухоженный кот", DocumentStatus::Actual)
            .unwrap();
        assert_eq!(ids(&found), vec![4, 13]);
        // 0.5 * ln(2 / 1) + 0.25 * ln(2 / 2)
        assert!((found[0].relevance - 0.346_573_590_279_972_6).abs() < 1e-12);
        assert_eq!(found[0].rating, 5);
        assert_eq!(found[1].relevance, 0.0);
        assert_eq!(found[1].rating, 2);
    }
}

#[test]
fn results_are_capped_at_five() {
    let mut server = SearchServer::new("").unwrap();
    for id in 0..10 {
        let text = format!("common word{id}");
        server.add_document(id, &text, DocumentStatus::Actual, &[id]).unwrap();
    }
    let found = server.find_top_documents("common").unwrap();
    // equal relevance, so highest rating first
    assert_eq!(ids(&found), vec![9, 8, 7, 6, 5]);
}

#[test]
fn removed_document_no_longer_affects_idf() {
    let mut server = SearchServer::new("").unwrap();
    server.add_document(1, "rare common", DocumentStatus::Actual, &[1]).unwrap();
    server.add_document(2, "common", DocumentStatus::Actual, &[1]).unwrap();
    server.add_document(3, "other", DocumentStatus::Actual, &[1]).unwrap();
    server.remove_document_with(ExecutionPolicy::Parallel, 3);
    let found = server.find_top_documents("rare").unwrap();
    assert_eq!(ids(&found), vec![1]);
    assert!((found[0].relevance - 0.5 * 2f64.ln()).abs() < 1e-12);
}
