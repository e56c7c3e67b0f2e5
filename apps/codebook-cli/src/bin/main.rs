use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use codebook_core::config::{expand_path, Config};
use codebook_core::traits::Embedder;
use codebook_core::types::ContentKind;
use codebook_embed::{get_default_embedder, EmbedConfig};
use codebook_generate::OllamaClient;
use codebook_index::ChunkIndexWriter;
use codebook_ingest::{build_indexes, chunk_sources, source::load_chapter_sources, ChunkStore};
use codebook_retrieve::intros::chapter_intros;
use codebook_retrieve::policy::chunk_configs;
use codebook_retrieve::{ChapterRetriever, ChapterSelector, QueryPipeline, CHAPTER_TOP_N};

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <ingest|ask|chapters> [args...]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn embedder_from(config: &Config) -> anyhow::Result<Arc<dyn Embedder>> {
    let model_dir: String = config.get_or("embedding.model_dir", "models/all-MiniLM-L6-v2".to_string());
    let model_id: String = config
        .get_or("embedding.model_id", "sentence-transformers/all-MiniLM-L6-v2".to_string());
    let embed_cfg = EmbedConfig { model_dir: expand_path(model_dir), model_id };
    Ok(Arc::from(get_default_embedder(&embed_cfg)?))
}

fn index_root(config: &Config) -> PathBuf {
    expand_path(config.get_or("data.index_dir", "data/indexes/lancedb".to_string()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "ingest" => {
            let source_dir = args.get(0).map(PathBuf::from).unwrap_or_else(|| {
                expand_path(config.get_or("data.source_dir", "data/chapters".to_string()))
            });
            println!("Ingesting chapter sources from {}", source_dir.display());
            let sources = load_chapter_sources(&source_dir)?;
            anyhow::ensure!(!sources.is_empty(), "no chapter_<N>.json files under {}", source_dir.display());

            let embedder = embedder_from(&config)?;
            let store = ChunkStore::new(expand_path(
                config.get_or("data.chunks_dir", "data/chunks".to_string()),
            ));
            let writer = ChunkIndexWriter::new(index_root(&config), embedder.model_id());

            let mut keys = Vec::new();
            for (chunk_size, chunk_overlap) in chunk_configs() {
                for content in [ContentKind::Text, ContentKind::Table] {
                    keys.extend(chunk_sources(&store, &sources, content, chunk_size, chunk_overlap)?);
                }
            }
            let built = tokio::runtime::Runtime::new()?
                .block_on(build_indexes(&store, &writer, embedder.as_ref(), &keys))?;
            println!("Ingest complete: {} chapters, {} index tables", sources.len(), built);
        }
        "ask" => {
            let query = args.get(0).cloned().unwrap_or_else(|| {
                eprintln!("Usage: codebook ask \"<query>\" [Very Short|Short|Long|Very Long]");
                std::process::exit(1)
            });
            let length = args.get(1).cloned().unwrap_or_else(|| "Very Long".to_string());

            let embedder = embedder_from(&config)?;
            let selector = ChapterSelector::new(embedder.clone(), &chapter_intros()?)?;
            let root = index_root(&config);
            let text = ChapterRetriever::new(root.clone(), embedder.clone(), ContentKind::Text);
            let tables = if config.get_or("retrieval.table_retrieval", false) {
                Some(ChapterRetriever::new(root, embedder.clone(), ContentKind::Table))
            } else {
                None
            };
            let generator = OllamaClient::new(
                &config.get_or("generation.base_url", "http://localhost:11434".to_string()),
                &config.get_or("generation.model", "llama3".to_string()),
                Duration::from_secs(config.get_or("generation.timeout_secs", 120u64)),
            )?;
            let top_n = config.get_or("retrieval.chapter_top_n", CHAPTER_TOP_N);
            let pipeline = QueryPipeline::new(embedder, selector, text, tables, generator, top_n);

            let answer = tokio::runtime::Runtime::new()?.block_on(pipeline.answer(&query, &length));
            println!("{}", answer);
        }
        "chapters" => {
            let query = args.get(0).cloned().unwrap_or_else(|| {
                eprintln!("Usage: codebook chapters \"<query>\"");
                std::process::exit(1)
            });
            let embedder = embedder_from(&config)?;
            let selector = ChapterSelector::new(embedder, &chapter_intros()?)?;
            let top_n = config.get_or("retrieval.chapter_top_n", CHAPTER_TOP_N);
            let selected = selector.select(&query, top_n)?;
            println!("Candidate chapters (best first): {:?}", selected);
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}
