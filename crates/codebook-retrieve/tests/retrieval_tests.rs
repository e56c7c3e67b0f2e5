use std::sync::Arc;

use codebook_core::types::{ChapterIntro, Chunk, ScoredChunk, CHAPTER_COUNT};
use codebook_embed::fake_embedder;
use codebook_retrieve::intros::chapter_intros;
use codebook_retrieve::{assemble, rerank, ChapterSelector, RERANK_THRESHOLD, TOP_K_TOTAL};

fn scored(chapter: u32, index: usize, content: &str) -> ScoredChunk {
    ScoredChunk { chunk: Chunk { chapter, chunk_index: index, content: content.into() }, score: 0.0 }
}

#[test]
fn assemble_empty_is_empty_string() {
    assert_eq!(assemble(&[]), "");
}

#[test]
fn assemble_preserves_order_and_round_trips() {
    let pool = vec![
        scored(1, 1, "alpha"),
        scored(2, 1, "bravo"),
        scored(1, 2, "charlie"),
    ];
    let joined = assemble(&pool);
    assert_eq!(joined, "alpha bravo charlie");
    // Splitting on the separator recovers the original texts when none
    // contain it.
    let parts: Vec<&str> = joined.split(' ').collect();
    assert_eq!(parts, vec!["alpha", "bravo", "charlie"]);
}

#[test]
fn rerank_is_identity_for_small_pools() -> anyhow::Result<()> {
    let embedder = fake_embedder();
    for n in [0usize, 1, RERANK_THRESHOLD] {
        let pool: Vec<ScoredChunk> = (0..n).map(|i| scored(1, i + 1, &format!("text {i}"))).collect();
        let before: Vec<String> = pool.iter().map(|s| s.chunk.content.clone()).collect();
        let after = rerank(embedder.as_ref(), "query", pool, TOP_K_TOTAL)?;
        let after_texts: Vec<String> = after.iter().map(|s| s.chunk.content.clone()).collect();
        assert_eq!(before, after_texts, "pool of {n} passes through untouched");
    }
    Ok(())
}

#[test]
fn rerank_caps_large_pools_and_introduces_nothing() -> anyhow::Result<()> {
    let embedder = fake_embedder();
    let pool: Vec<ScoredChunk> = (0..15)
        .map(|i| scored(1 + (i as u32 % 3), i + 1, &format!("provision number {i} about drainage")))
        .collect();
    let originals: Vec<String> = pool.iter().map(|s| s.chunk.content.clone()).collect();

    let after = rerank(embedder.as_ref(), "drainage provision", pool, TOP_K_TOTAL)?;
    assert!(after.len() <= TOP_K_TOTAL);
    for hit in &after {
        assert!(originals.contains(&hit.chunk.content), "re-ranking only reorders the pool");
    }
    Ok(())
}

#[test]
fn rerank_prefers_chunks_matching_the_query() -> anyhow::Result<()> {
    let embedder = fake_embedder();
    let mut pool: Vec<ScoredChunk> = (0..11)
        .map(|i| scored(3, i + 1, &format!("unrelated filler sentence number {i}")))
        .collect();
    pool.push(scored(10, 12, "masonry chimney flue lining requirements"));

    let after = rerank(embedder.as_ref(), "masonry chimney flue", pool, TOP_K_TOTAL)?;
    assert_eq!(after[0].chunk.chapter, 10, "the matching chunk rises to the top");
    assert!(after[0].score >= after[1].score);
    Ok(())
}

#[test]
fn selector_bounds_and_uniqueness_over_full_corpus() -> anyhow::Result<()> {
    let embedder: Arc<dyn codebook_core::traits::Embedder> = Arc::from(fake_embedder());
    let intros = chapter_intros()?;
    assert_eq!(intros.len(), CHAPTER_COUNT as usize);

    let selector = ChapterSelector::new(embedder, &intros)?;
    let selected = selector.select("What are the requirements for masonry chimneys?", 5)?;

    assert!(selected.len() <= 5);
    let mut seen = std::collections::HashSet::new();
    for chapter in &selected {
        assert!((1..=CHAPTER_COUNT).contains(chapter));
        assert!(seen.insert(*chapter), "no duplicate chapters");
    }
    assert!(selected.contains(&10), "the chimney chapter is a candidate");
    Ok(())
}

#[test]
fn selector_returns_fewer_when_corpus_is_small() -> anyhow::Result<()> {
    let embedder: Arc<dyn codebook_core::traits::Embedder> = Arc::from(fake_embedder());
    let intros = vec![
        ChapterIntro { chapter: 4, summary: "foundations footings soil".into() },
        ChapterIntro { chapter: 5, summary: "floors joists framing".into() },
    ];
    let selector = ChapterSelector::new(embedder, &intros)?;
    let selected = selector.select("footings", 5)?;
    assert_eq!(selected.len(), 2, "no error when fewer intros exist");
    assert_eq!(selected[0], 4);
    Ok(())
}

#[test]
fn selector_is_deterministic() -> anyhow::Result<()> {
    let embedder: Arc<dyn codebook_core::traits::Embedder> = Arc::from(fake_embedder());
    let intros = chapter_intros()?;
    let selector = ChapterSelector::new(embedder, &intros)?;
    let a = selector.select("water heater relief valves", 5)?;
    let b = selector.select("water heater relief valves", 5)?;
    assert_eq!(a, b);
    Ok(())
}
