use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use codebook_core::traits::Embedder;
use codebook_core::types::ChapterIntro;
use codebook_index::MemoryIndex;

/// Routes a query to candidate chapters by similarity against the static
/// chapter-introduction corpus. The corpus is embedded once at construction;
/// selection itself only embeds the query.
pub struct ChapterSelector {
    embedder: Arc<dyn Embedder>,
    index: MemoryIndex<ChapterIntro>,
}

impl ChapterSelector {
    pub fn new(embedder: Arc<dyn Embedder>, intros: &[ChapterIntro]) -> Result<Self> {
        let index = MemoryIndex::build(embedder.as_ref(), intros.to_vec(), |i| i.summary.as_str())?;
        Ok(Self { embedder, index })
    }

    /// The `n` chapters whose introductions best match `query`, best first.
    /// Returns fewer when fewer introductions exist; never errors for small
    /// corpora.
    pub fn select(&self, query: &str, n: usize) -> Result<Vec<u32>> {
        let qvec = self.embedder.embed_batch(&[query.to_string()])?.remove(0);
        let chapters: Vec<u32> = self
            .index
            .query(&qvec, n)
            .into_iter()
            .map(|(intro, _)| intro.chapter)
            .collect();
        debug!(?chapters, "selected chapters");
        Ok(chapters)
    }
}
