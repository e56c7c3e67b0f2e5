use anyhow::Result;
use std::path::{Path, PathBuf};

use codebook_core::error::Error;
use codebook_core::types::{Chunk, IndexKey};

/// Persisted chunk collections, one JSON file per
/// (content, chunk_size, chunk_overlap, chapter) key. Written once by the
/// chunking phase, read back by the index build.
pub struct ChunkStore {
    chunks_dir: PathBuf,
}

impl ChunkStore {
    pub fn new(chunks_dir: impl Into<PathBuf>) -> Self {
        Self { chunks_dir: chunks_dir.into() }
    }

    pub fn path_for(&self, key: &IndexKey) -> PathBuf {
        key.chunk_file(&self.chunks_dir)
    }

    pub fn save(&self, key: &IndexKey, chunks: &[Chunk]) -> Result<PathBuf> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer(file, chunks)?;
        Ok(path)
    }

    /// Validated load: a file that is unreadable, fails to deserialize, or
    /// carries chunks tagged with the wrong chapter is `CorruptChunkFile`.
    pub fn load(&self, key: &IndexKey) -> Result<Vec<Chunk>> {
        let path = self.path_for(key);
        let raw = std::fs::read_to_string(&path).map_err(|e| corrupt(&path, e.to_string()))?;
        let chunks: Vec<Chunk> =
            serde_json::from_str(&raw).map_err(|e| corrupt(&path, e.to_string()))?;
        if let Some(stray) = chunks.iter().find(|c| c.chapter != key.chapter) {
            return Err(corrupt(
                &path,
                format!("chunk tagged chapter {} in chapter {} file", stray.chapter, key.chapter),
            )
            .into());
        }
        Ok(chunks)
    }
}

fn corrupt(path: &Path, detail: String) -> Error {
    Error::CorruptChunkFile { path: path.to_path_buf(), detail }
}
