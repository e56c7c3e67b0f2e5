//! Offline indexing pipeline: per-chapter extractor output is chunked into
//! overlapping windows, persisted to the chunk store, embedded, and written
//! as per-chapter vector index tables. Runs to completion before any query
//! is served; the query path never writes.

pub mod build;
pub mod chunker;
pub mod source;
pub mod store;
pub mod tables;

pub use build::{build_indexes, chunk_sources};
pub use store::ChunkStore;
