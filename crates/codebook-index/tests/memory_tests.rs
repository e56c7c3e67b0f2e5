use codebook_embed::{fake_embedder, Embedder as _};
use codebook_index::memory::{cosine, MemoryIndex};

fn corpus() -> Vec<(u32, String)> {
    vec![
        (1, "administration enforcement permits inspections".to_string()),
        (2, "definitions terms vocabulary glossary".to_string()),
        (10, "masonry chimneys fireplaces hearth flue".to_string()),
    ]
}

#[test]
fn query_ranks_best_match_first() {
    let embedder = fake_embedder();
    let index = MemoryIndex::build(embedder.as_ref(), corpus(), |(_, text)| text).expect("build");
    assert_eq!(index.len(), 3);

    let qvec = embedder
        .embed_batch(&["masonry chimneys requirements".to_string()])
        .expect("embed")
        .remove(0);
    let hits = index.query(&qvec, 2);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].0 .0, 10, "chimney chapter wins");
    assert!(hits[0].1 >= hits[1].1, "scores are descending");
}

#[test]
fn query_caps_at_k_and_at_corpus_size() {
    let embedder = fake_embedder();
    let index = MemoryIndex::build(embedder.as_ref(), corpus(), |(_, text)| text).expect("build");
    let qvec = embedder.embed_batch(&["permits".to_string()]).expect("embed").remove(0);

    assert_eq!(index.query(&qvec, 1).len(), 1);
    // Asking for more than exists returns what exists, no error
    assert_eq!(index.query(&qvec, 99).len(), 3);
}

#[test]
fn query_is_deterministic() {
    let embedder = fake_embedder();
    let index = MemoryIndex::build(embedder.as_ref(), corpus(), |(_, text)| text).expect("build");
    let qvec = embedder.embed_batch(&["definitions".to_string()]).expect("embed").remove(0);

    let first: Vec<u32> = index.query(&qvec, 3).into_iter().map(|(i, _)| i.0).collect();
    let second: Vec<u32> = index.query(&qvec, 3).into_iter().map(|(i, _)| i.0).collect();
    assert_eq!(first, second);
}

#[test]
fn cosine_of_identical_vectors_is_one() {
    let v = vec![0.6f32, 0.8, 0.0];
    assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
    let w = vec![0.0f32, 0.0, 1.0];
    assert!(cosine(&v, &w).abs() < 1e-6);
}
