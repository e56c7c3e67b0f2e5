use codebook_core::error::Error;
use codebook_core::types::{Chunk, ContentKind, IndexKey};
use codebook_embed::{fake_embedder, Embedder as _};
use codebook_index::{ChunkIndexReader, ChunkIndexWriter};

fn chapter_chunks(chapter: u32, texts: &[&str]) -> Vec<Chunk> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| Chunk { chapter, chunk_index: i + 1, content: (*t).to_string() })
        .collect()
}

#[tokio::test]
async fn write_then_search_round_trip() -> anyhow::Result<()> {
    let embedder = fake_embedder();
    let tmp = tempfile::tempdir()?;
    let writer = ChunkIndexWriter::new(tmp.path(), embedder.model_id());

    let key = IndexKey::new(ContentKind::Text, 800, 150, 10);
    let chunks = chapter_chunks(
        10,
        &[
            "masonry chimneys shall be constructed of solid masonry units",
            "factory-built fireplaces rely on listing and labeling",
            "seismic reinforcing and anchorage of masonry fireplaces",
        ],
    );
    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts)?;
    writer.write(&key, &chunks, &embeddings).await?;

    let reader = ChunkIndexReader::open(tmp.path(), embedder.model_id(), ContentKind::Text, 800, 150).await?;
    let qvec = embedder.embed_batch(&["masonry chimneys".to_string()])?.remove(0);
    let hits = reader.search(&key, &qvec, 2).await?;

    assert_eq!(hits.len(), 2);
    for hit in &hits {
        assert_eq!(hit.chunk.chapter, 10);
        assert!(hit.chunk.chunk_index >= 1);
    }
    assert!(hits[0].score >= hits[1].score, "hits are score-ordered");
    assert!(hits[0].chunk.content.contains("masonry"));
    Ok(())
}

#[tokio::test]
async fn missing_chapter_table_is_a_typed_error() -> anyhow::Result<()> {
    let embedder = fake_embedder();
    let tmp = tempfile::tempdir()?;

    let reader = ChunkIndexReader::open(tmp.path(), embedder.model_id(), ContentKind::Text, 800, 150).await?;
    let qvec = embedder.embed_batch(&["anything".to_string()])?.remove(0);
    let missing = IndexKey::new(ContentKind::Text, 800, 150, 23);
    let err = reader.search(&missing, &qvec, 3).await.expect_err("no table");

    match err.downcast_ref::<Error>() {
        Some(Error::MissingChapterIndex { chapter, .. }) => assert_eq!(*chapter, 23),
        other => panic!("expected MissingChapterIndex, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn wipe_family_removes_all_chapter_tables() -> anyhow::Result<()> {
    let embedder = fake_embedder();
    let tmp = tempfile::tempdir()?;
    let writer = ChunkIndexWriter::new(tmp.path(), embedder.model_id());

    let key = IndexKey::new(ContentKind::Text, 1000, 100, 5);
    let chunks = chapter_chunks(5, &["floor framing spans", "concrete slabs on ground"]);
    let embeddings = embedder.embed_batch(&["a".into(), "b".into()])?;
    writer.write(&key, &chunks, &embeddings).await?;

    writer.wipe_family(ContentKind::Text, 1000, 100)?;

    let reader = ChunkIndexReader::open(tmp.path(), embedder.model_id(), ContentKind::Text, 1000, 100).await?;
    let qvec = embedder.embed_batch(&["floor".to_string()])?.remove(0);
    let err = reader.search(&key, &qvec, 1).await.expect_err("family wiped");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MissingChapterIndex { .. })));
    Ok(())
}
