use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use codebook_core::error::Error;
use codebook_core::traits::Embedder;
use codebook_generate::{build_prompt, OllamaClient};

use crate::assemble::assemble;
use crate::policy::AnswerLength;
use crate::rerank::rerank;
use crate::retriever::ChapterRetriever;
use crate::selector::ChapterSelector;

/// Stands in for table context when the table pipeline is disabled or
/// retrieved nothing.
pub const NO_TABLE_PLACEHOLDER: &str = "NO TABLE";

const NO_CONTEXT_MESSAGE: &str = "No retrieved text available for answering.";
const NO_ANSWER_MESSAGE: &str = "No meaningful response from the generation model.";

/// The full query path: chapter selection, per-chapter retrieval, optional
/// cross-chapter re-rank, context assembly, one generation call.
///
/// `answer` never fails: every error in the taxonomy is rendered to a
/// user-facing string, so the surface layer always receives plain text.
pub struct QueryPipeline {
    embedder: Arc<dyn Embedder>,
    selector: ChapterSelector,
    text: ChapterRetriever,
    tables: Option<ChapterRetriever>,
    generator: OllamaClient,
    chapter_top_n: usize,
}

impl QueryPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        selector: ChapterSelector,
        text: ChapterRetriever,
        tables: Option<ChapterRetriever>,
        generator: OllamaClient,
        chapter_top_n: usize,
    ) -> Self {
        Self { embedder, selector, text, tables, generator, chapter_top_n }
    }

    pub async fn answer(&self, query: &str, length_label: &str) -> String {
        match self.run(query, length_label).await {
            Ok(answer) => answer,
            Err(e) => render_error(&e),
        }
    }

    async fn run(&self, query: &str, length_label: &str) -> Result<String> {
        let chapters = self.selector.select(query, self.chapter_top_n)?;
        let cfg = AnswerLength::parse(length_label).retrieval_config();
        info!(?chapters, ?cfg, "retrieving");

        let pool = self.text.retrieve(query, &chapters, &cfg).await?;
        let pool = rerank(self.embedder.as_ref(), query, pool, cfg.top_k_total)?;
        let context = assemble(&pool);
        if context.trim().is_empty() {
            return Err(Error::EmptyRetrieval.into());
        }

        let table_context = match &self.tables {
            Some(retriever) => {
                let tpool = retriever.retrieve(query, &chapters, &cfg).await?;
                let tpool = rerank(self.embedder.as_ref(), query, tpool, cfg.top_k_total)?;
                let ctx = assemble(&tpool);
                if ctx.trim().is_empty() { NO_TABLE_PLACEHOLDER.to_string() } else { ctx }
            }
            None => NO_TABLE_PLACEHOLDER.to_string(),
        };

        let prompt = build_prompt(&context, &table_context, query);
        let answer = self.generator.generate(&prompt).await?;
        if answer.trim().is_empty() {
            return Ok(NO_ANSWER_MESSAGE.to_string());
        }
        Ok(answer)
    }
}

fn render_error(e: &anyhow::Error) -> String {
    match e.downcast_ref::<Error>() {
        Some(Error::EmptyRetrieval) => NO_CONTEXT_MESSAGE.to_string(),
        Some(Error::GenerationApi { status, body }) => format!("API Error: {status} - {body}"),
        Some(Error::GenerationConnection(detail)) => {
            format!("Failed to connect to the generation API: {detail}")
        }
        Some(Error::GenerationTimeout(secs)) => {
            format!("Generation request timed out after {secs}s.")
        }
        _ => format!("Retrieval failed: {e}"),
    }
}
