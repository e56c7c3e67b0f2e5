use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use codebook_core::error::Error;
use codebook_core::traits::Embedder;
use codebook_core::types::{ContentKind, IndexKey, RetrievalConfig, ScoredChunk};
use codebook_index::ChunkIndexReader;

/// Retrieves the top chunks per chapter from the persisted per-chapter
/// index tables of one content kind. Read-only; the offline build is the
/// sole writer.
pub struct ChapterRetriever {
    index_root: PathBuf,
    model_id: String,
    content: ContentKind,
    embedder: Arc<dyn Embedder>,
}

impl ChapterRetriever {
    pub fn new(index_root: impl Into<PathBuf>, embedder: Arc<dyn Embedder>, content: ContentKind) -> Self {
        let model_id = embedder.model_id().to_string();
        Self { index_root: index_root.into(), model_id, content, embedder }
    }

    /// Query each chapter's table independently for its
    /// `top_k_per_chapter` nearest chunks and concatenate the results.
    ///
    /// Output order is chapter order followed by per-chapter rank; there is
    /// no cross-chapter ordering guarantee at this stage. A chapter without
    /// a persisted table contributes nothing: either it never produced
    /// chunks or no index was built for this configuration, and the two are
    /// deliberately indistinguishable here.
    pub async fn retrieve(
        &self,
        query: &str,
        chapters: &[u32],
        cfg: &RetrievalConfig,
    ) -> Result<Vec<ScoredChunk>> {
        let qvec = self.embedder.embed_batch(&[query.to_string()])?.remove(0);
        let reader = ChunkIndexReader::open(
            &self.index_root,
            &self.model_id,
            self.content,
            cfg.chunk_size,
            cfg.chunk_overlap,
        )
        .await?;

        let mut pool = Vec::new();
        for &chapter in chapters {
            let key = IndexKey::new(self.content, cfg.chunk_size, cfg.chunk_overlap, chapter);
            match reader.search(&key, &qvec, cfg.top_k_per_chapter).await {
                Ok(mut hits) => pool.append(&mut hits),
                Err(e) => {
                    if matches!(e.downcast_ref::<Error>(), Some(Error::MissingChapterIndex { .. })) {
                        debug!(chapter, content = %self.content, "no index for chapter, skipping");
                    } else {
                        return Err(e);
                    }
                }
            }
        }
        Ok(pool)
    }
}
