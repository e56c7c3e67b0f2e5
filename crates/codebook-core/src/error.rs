use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy of the query and ingest paths.
///
/// Everything here is recoverable at the top-level query handler, which
/// renders each variant to a user-facing string; nothing is allowed to
/// propagate past it.
#[derive(Debug, Error)]
pub enum Error {
    /// A selected chapter has no persisted index for the requested
    /// configuration. Recovered locally: the chapter is skipped.
    #[error("no persisted index for chapter {chapter} (table {table})")]
    MissingChapterIndex { chapter: u32, table: String },

    /// A persisted chunk or source file failed the typed load contract.
    #[error("corrupt chunk file {path}: {detail}")]
    CorruptChunkFile { path: PathBuf, detail: String },

    /// No text was retrieved for the query; generation is not invoked.
    #[error("no content retrieved for the query")]
    EmptyRetrieval,

    /// Non-200 response from the generation backend.
    #[error("generation API error: {status} - {body}")]
    GenerationApi { status: u16, body: String },

    /// Transport failure reaching the generation backend.
    #[error("failed to connect to the generation API: {0}")]
    GenerationConnection(String),

    /// The generation request exceeded the configured deadline.
    #[error("generation request timed out after {0}s")]
    GenerationTimeout(u64),
}

pub type Result<T> = std::result::Result<T, Error>;
