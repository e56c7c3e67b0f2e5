//! Persisted per-chapter chunk indexes. One LanceDB database per
//! (content, model, chunk_size, chunk_overlap) family, one table per
//! chapter. The offline build is the sole writer; query-time access is
//! read-only.

use anyhow::{anyhow, Result};
use arrow_array::RecordBatchIterator;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, DistanceType};
use std::path::{Path, PathBuf};
use tracing::debug;

use codebook_core::error::Error;
use codebook_core::types::{Chunk, ContentKind, IndexKey, ScoredChunk};

use crate::schema::chunks_to_record_batch;
use crate::table::{open_db, table_exists};

pub struct ChunkIndexWriter {
    root: PathBuf,
    model_id: String,
}

impl ChunkIndexWriter {
    pub fn new(root: impl Into<PathBuf>, model_id: impl Into<String>) -> Self {
        Self { root: root.into(), model_id: model_id.into() }
    }

    /// Remove every persisted table of one (content, size, overlap) family.
    /// The offline build wipes a family before rebuilding it, so a table is
    /// never half old, half new.
    pub fn wipe_family(
        &self,
        content: ContentKind,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<()> {
        let dir = IndexKey::family_dir(&self.root, &self.model_id, content, chunk_size, chunk_overlap);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Persist one chapter's chunks and their embeddings as the table for
    /// `key`. Empty chunk sets are a producer-side bug: callers skip them
    /// before getting here.
    pub async fn write(&self, key: &IndexKey, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()> {
        anyhow::ensure!(!chunks.is_empty(), "refusing to persist an empty chunk set for {key:?}");
        anyhow::ensure!(
            chunks.len() == embeddings.len(),
            "chunks and embeddings length must match"
        );
        let dim = embeddings[0].len() as i32;
        let db_dir = key.db_dir(&self.root, &self.model_id);
        std::fs::create_dir_all(&db_dir)?;
        let conn = open_db(&db_dir).await?;
        let batch = chunks_to_record_batch(chunks, embeddings, dim)?;
        let schema = batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
        let name = key.table_name();
        if table_exists(&conn, &name).await? {
            conn.open_table(&name).execute().await?.add(reader).execute().await?;
        } else {
            conn.create_table(&name, reader).execute().await?;
        }
        debug!(table = %name, rows = chunks.len(), "persisted chapter index");
        Ok(())
    }
}

/// Read-only access to one family's chapter tables.
pub struct ChunkIndexReader {
    conn: Connection,
}

impl ChunkIndexReader {
    pub async fn open(
        root: &Path,
        model_id: &str,
        content: ContentKind,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Self> {
        let dir = IndexKey::family_dir(root, model_id, content, chunk_size, chunk_overlap);
        // A family that was never built is a valid state: an empty database
        // whose every chapter lookup reports MissingChapterIndex.
        std::fs::create_dir_all(&dir)?;
        let conn = open_db(&dir).await?;
        Ok(Self { conn })
    }

    /// Nearest chunks to `query_vec` within one chapter's table, best first,
    /// scored `1.0 - cosine_distance`. A missing table surfaces as
    /// `Error::MissingChapterIndex` so callers can skip the chapter.
    pub async fn search(&self, key: &IndexKey, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let name = key.table_name();
        if !table_exists(&self.conn, &name).await? {
            return Err(Error::MissingChapterIndex { chapter: key.chapter, table: name }.into());
        }
        let table = self.conn.open_table(&name).execute().await?;
        let mut stream = table
            .vector_search(query_vec.to_vec())?
            .distance_type(DistanceType::Cosine)
            .limit(k)
            .execute()
            .await?;
        let mut hits = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            let chapters = int_col(&batch, "chapter")?;
            let chunk_indices = int_col(&batch, "chunk_index")?;
            let contents = string_col(&batch, "content")?;
            let distances = float_col(&batch, "_distance")?;
            for i in 0..batch.num_rows() {
                hits.push(ScoredChunk {
                    chunk: Chunk {
                        chapter: chapters.value(i) as u32,
                        chunk_index: chunk_indices.value(i) as usize,
                        content: contents.value(i).to_string(),
                    },
                    score: 1.0 - distances.value(i),
                });
            }
        }
        Ok(hits)
    }
}

fn string_col<'a>(batch: &'a arrow_array::RecordBatch, name: &str) -> Result<&'a arrow_array::StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<arrow_array::StringArray>())
        .ok_or_else(|| anyhow!("missing or mistyped column '{name}'"))
}

fn int_col<'a>(batch: &'a arrow_array::RecordBatch, name: &str) -> Result<&'a arrow_array::Int32Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<arrow_array::Int32Array>())
        .ok_or_else(|| anyhow!("missing or mistyped column '{name}'"))
}

fn float_col<'a>(batch: &'a arrow_array::RecordBatch, name: &str) -> Result<&'a arrow_array::Float32Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<arrow_array::Float32Array>())
        .ok_or_else(|| anyhow!("missing or mistyped column '{name}'"))
}
