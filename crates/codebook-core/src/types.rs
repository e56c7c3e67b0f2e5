//! Domain types shared by the ingest, index and retrieval crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Chapters of the source document are numbered 1..=CHAPTER_COUNT.
pub const CHAPTER_COUNT: u32 = 44;

/// Two parallel chunk/index families over the same chapters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Table,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Table => "table",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bounded span of chapter content, the unit of retrieval.
///
/// Produced once by the offline chunking step and never mutated.
/// `chunk_index` is 1-based within its chapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    pub chapter: u32,
    pub chunk_index: usize,
    pub content: String,
}

/// A short static summary per chapter. Used only to route a query to
/// candidate chapters; never chunked further.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterIntro {
    pub chapter: u32,
    pub summary: String,
}

/// A chunk plus the similarity score the producing index assigned to it.
/// Higher is always better.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Per-query retrieval parameters, derived from the answer-length label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k_per_chapter: usize,
    pub top_k_total: usize,
}

/// Identifies one persisted chunk collection / vector index.
///
/// Each (content, chunk_size, chunk_overlap) combination partitions chunks
/// strictly by chapter: one chunk file and one index table per chapter,
/// no cross-chapter mixing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub content: ContentKind,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub chapter: u32,
}

impl IndexKey {
    pub fn new(content: ContentKind, chunk_size: usize, chunk_overlap: usize, chapter: u32) -> Self {
        Self { content, chunk_size, chunk_overlap, chapter }
    }

    /// Path of the persisted chunk collection for this key:
    /// `<chunks_dir>/<content>/<size>_<overlap>/chapter_<N>_chunks.json`
    pub fn chunk_file(&self, chunks_dir: &Path) -> PathBuf {
        chunks_dir
            .join(self.content.as_str())
            .join(format!("{}_{}", self.chunk_size, self.chunk_overlap))
            .join(format!("chapter_{}_chunks.json", self.chapter))
    }

    /// Directory of the vector database holding this key's chapter tables:
    /// `<index_root>/<content>/<model>/<size>_<overlap>`
    pub fn db_dir(&self, index_root: &Path, model_id: &str) -> PathBuf {
        Self::family_dir(index_root, model_id, self.content, self.chunk_size, self.chunk_overlap)
    }

    /// Database directory shared by every chapter of one
    /// (content, chunk_size, chunk_overlap) family.
    pub fn family_dir(
        index_root: &Path,
        model_id: &str,
        content: ContentKind,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> PathBuf {
        index_root
            .join(content.as_str())
            .join(normalize_model_id(model_id))
            .join(format!("{chunk_size}_{chunk_overlap}"))
    }

    /// Table name within the database, one per chapter.
    pub fn table_name(&self) -> String {
        format!("chapter_{}", self.chapter)
    }
}

/// Filesystem-safe form of an embedding model identifier
/// (`sentence-transformers/all-MiniLM-L6-v2` -> `sentence-transformers-all-MiniLM-L6-v2`).
pub fn normalize_model_id(model_id: &str) -> String {
    model_id.replace('/', "-")
}

/// Per-chapter extractor output: cleaned running text plus extracted tables
/// (rows of cells). Produced outside this system by the PDF extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterSource {
    pub chapter: u32,
    pub text: String,
    #[serde(default)]
    pub tables: Vec<Vec<Vec<String>>>,
}
