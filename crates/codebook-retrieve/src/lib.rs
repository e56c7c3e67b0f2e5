//! The hierarchical retrieval core: route a query to candidate chapters,
//! retrieve the best chunks within each, optionally re-rank the pooled
//! candidates across chapters, and assemble the context handed to the
//! generation call.

pub mod assemble;
pub mod intros;
pub mod pipeline;
pub mod policy;
pub mod rerank;
pub mod retriever;
pub mod selector;

pub use assemble::assemble;
pub use pipeline::QueryPipeline;
pub use policy::{AnswerLength, CHAPTER_TOP_N, RERANK_THRESHOLD, TOP_K_TOTAL};
pub use rerank::rerank;
pub use retriever::ChapterRetriever;
pub use selector::ChapterSelector;
