use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use tracing::info;

use codebook_core::traits::Embedder;
use codebook_core::types::{ChapterSource, ContentKind, IndexKey};
use codebook_index::ChunkIndexWriter;

use crate::chunker::chunk_chapter;
use crate::store::ChunkStore;
use crate::tables::flatten_tables;

/// Phase one: window every chapter's content for one (content, size,
/// overlap) configuration and persist the non-empty chunk sets. Chapters
/// whose windows are all empty or whitespace are never persisted, so the
/// index build (and later the retriever) sees no trace of them.
pub fn chunk_sources(
    store: &ChunkStore,
    sources: &[ChapterSource],
    content: ContentKind,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<Vec<IndexKey>> {
    let mut keys = Vec::new();
    for source in sources {
        let data = match content {
            ContentKind::Text => source.text.clone(),
            ContentKind::Table => flatten_tables(source.chapter, &source.tables),
        };
        let chunks = chunk_chapter(source.chapter, &data, chunk_size, chunk_overlap);
        if chunks.is_empty() {
            info!(chapter = source.chapter, %content, "no usable content, skipping chapter");
            continue;
        }
        let key = IndexKey::new(content, chunk_size, chunk_overlap, source.chapter);
        store.save(&key, &chunks)?;
        keys.push(key);
    }
    info!(%content, chunk_size, chunk_overlap, chapters = keys.len(), "chunking complete");
    Ok(keys)
}

/// Phase two: load each persisted chunk set, embed it, and write the
/// per-chapter index table. Families touched by `keys` are wiped first so a
/// rebuild replaces rather than appends.
pub async fn build_indexes(
    store: &ChunkStore,
    writer: &ChunkIndexWriter,
    embedder: &dyn Embedder,
    keys: &[IndexKey],
) -> Result<usize> {
    let mut families: HashSet<(ContentKind, usize, usize)> = HashSet::new();
    for key in keys {
        if families.insert((key.content, key.chunk_size, key.chunk_overlap)) {
            writer.wipe_family(key.content, key.chunk_size, key.chunk_overlap)?;
        }
    }

    let pb = ProgressBar::new(keys.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chapters ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );
    let mut built = 0usize;
    for key in keys {
        pb.set_message(format!("chapter {}", key.chapter));
        let chunks = store.load(key)?;
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts)?;
        writer.write(key, &chunks, &embeddings).await?;
        built += 1;
        pb.inc(1);
    }
    pb.finish_with_message("index build complete");
    info!(tables = built, "wrote chapter index tables");
    Ok(built)
}
