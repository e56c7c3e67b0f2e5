//! The Vector Index capability, used twice by the pipeline:
//! persisted per-chapter LanceDB tables for the chunk corpus, and a
//! transient in-memory exact-cosine index for the chapter-intro corpus
//! and the re-rank pool.

pub mod memory;
pub mod schema;
pub mod store;
pub mod table;

pub use memory::MemoryIndex;
pub use store::{ChunkIndexReader, ChunkIndexWriter};
