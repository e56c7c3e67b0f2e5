use anyhow::Result;
use tracing::debug;

use codebook_core::traits::Embedder;
use codebook_core::types::{Chunk, ScoredChunk};
use codebook_index::MemoryIndex;

use crate::policy::RERANK_THRESHOLD;

/// Collapse the per-chapter rankings of an over-large pool into one
/// cross-chapter ranking.
///
/// A pool of at most `RERANK_THRESHOLD` chunks is returned unchanged,
/// order and scores preserved. A larger pool is indexed from scratch
/// (incoming scores are discarded; only the raw text matters) and queried
/// once for the global `top_k_total` best.
///
/// Contract note: because the small-pool branch bypasses the cap, the
/// final result size is NOT always `top_k_total` — it ranges from 0 to the
/// threshold on one branch and up to `top_k_total` on the other. Callers
/// rely on this asymmetry being stable.
pub fn rerank(
    embedder: &dyn Embedder,
    query: &str,
    pool: Vec<ScoredChunk>,
    top_k_total: usize,
) -> Result<Vec<ScoredChunk>> {
    if pool.len() <= RERANK_THRESHOLD {
        return Ok(pool);
    }
    debug!(pool = pool.len(), top_k_total, "re-ranking candidate pool");
    let chunks: Vec<Chunk> = pool.into_iter().map(|s| s.chunk).collect();
    let index = MemoryIndex::build(embedder, chunks, |c| c.content.as_str())?;
    let qvec = embedder.embed_batch(&[query.to_string()])?.remove(0);
    Ok(index
        .query(&qvec, top_k_total)
        .into_iter()
        .map(|(chunk, score)| ScoredChunk { chunk, score })
        .collect())
}
