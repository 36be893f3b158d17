//! Ranking properties: top-k order, zero vectors, empty input, and k clamping.

use kbase_context::{DocumentIndex, rank};

/// Identical beats orthogonal beats opposite; k=2 drops the opposite vector.
#[test]
fn test_top_k_order() {
    let query = vec![0.3_f32, -1.2, 2.0];
    let orthogonal = vec![2.0_f32, 0.5, 0.0];
    let opposite: Vec<f32> = query.iter().map(|component| -component).collect();
    let candidates = vec![query.clone(), orthogonal, opposite];

    assert_eq!(rank(&query, &candidates, 2).expect("rank"), vec![0, 1]);
}

/// A zero vector never outranks a real match.
#[test]
fn test_zero_vector_demoted() {
    let query = vec![0.5_f32, 0.5, 0.1];
    let candidates = vec![vec![0.0_f32; 3], query.clone()];

    assert_eq!(rank(&query, &candidates, 1).expect("rank"), vec![1]);
}

/// No candidates, no results.
#[test]
fn test_empty_candidates() {
    let candidates: Vec<Vec<f32>> = Vec::new();
    assert!(rank(&[1.0, 0.0], &candidates, 5).expect("rank").is_empty());
}

/// Asking for more than exists returns everything.
#[test]
fn test_k_clamped() {
    let candidates: Vec<Vec<f32>> = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
    let ranked = rank(&[1.0, 0.0], &candidates, 10).expect("rank");

    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked, vec![0, 2, 1]);
}

/// Zero vectors tie at 0.0 and keep document order among themselves.
#[test]
fn test_zero_vectors_keep_document_order() {
    let candidates: Vec<Vec<f32>> = vec![
        vec![0.0, 0.0],
        vec![-1.0, 0.0],
        vec![0.0, 0.0],
        vec![1.0, 0.0],
    ];
    assert_eq!(
        rank(&[1.0, 0.0], &candidates, 4).expect("rank"),
        vec![3, 0, 2, 1]
    );
}

/// The index search returns chunk text alongside scores.
#[test]
fn test_index_search_returns_text() {
    let index = DocumentIndex::from_parts(
        vec!["cats purr".to_owned(), "dogs bark".to_owned()],
        vec![vec![0.9, 0.1], vec![0.1, 0.9]],
    )
    .expect("index");

    let hits = index.search(&[0.0, 1.0], 1).expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "dogs bark");
    assert!(hits[0].score > 0.9);
}
