//! Embedding collaborator: a candle-based sentence-transformer
//! (all-MiniLM-L6-v2, 384-dim, mean pooling + L2 norm) plus a deterministic
//! hashing embedder for tests, selected with `APP_USE_FAKE_EMBEDDINGS=1`.

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing::info;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use codebook_core::traits::Embedder;

use crate::device::select_device;
use crate::pool::masked_mean_l2;
use crate::tokenize::tokenize_on_device;

/// Where to find the model files and what to call the model in index keys.
#[derive(Debug, Clone)]
pub struct EmbedConfig {
    pub model_dir: PathBuf,
    pub model_id: String,
}

const MAX_LEN: usize = 256;
const FAKE_DIM: usize = 384;

pub struct SentenceEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    model_id: String,
}

impl SentenceEmbedder {
    pub fn new(cfg: &EmbedConfig) -> Result<Self> {
        let device = select_device();
        info!(model_dir = %cfg.model_dir.display(), "loading sentence-transformer");
        let tokenizer_path = cfg.model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = cfg.model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let weights_path = cfg.model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let dim = config.hidden_size;
        let model = BertModel::load(vb, &config)?;
        info!(dim, "sentence-transformer ready");
        Ok(Self { model, tokenizer, device, dim, model_id: cfg.model_id.clone() })
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) =
            tokenize_on_device(&self.tokenizer, text, MAX_LEN, &self.device)?;
        let token_type_ids = Tensor::zeros((1, MAX_LEN), DType::U32, &self.device)?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let emb: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        debug_assert_eq!(emb.len(), self.dim);
        Ok(emb)
    }
}

impl Embedder for SentenceEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }
}

/// Hashed bag-of-words embedder. Deterministic, L2-normalized, and cheap:
/// texts sharing words land in the same buckets, which is enough signal for
/// similarity-ordering tests without model files.
struct FakeEmbedder {
    dim: usize,
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn model_id(&self) -> &str {
        "fake-embedder"
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| Ok(self.embed_one(t))).collect()
    }
}

impl FakeEmbedder {
    fn embed_one(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for token in text.to_lowercase().split_whitespace() {
            let token = token.trim_matches(|c: char| !c.is_alphanumeric());
            if token.is_empty() {
                continue;
            }
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            v[idx] += 1.0 + (((h >> 32) as u32) as f32) / (u32::MAX as f32);
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

/// Deterministic test embedder, independent of any model files.
pub fn fake_embedder() -> Box<dyn Embedder> {
    Box::new(FakeEmbedder { dim: FAKE_DIM })
}

pub fn get_default_embedder(cfg: &EmbedConfig) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        info!("using fake embedder");
        return Ok(fake_embedder());
    }
    Ok(Box::new(SentenceEmbedder::new(cfg)?))
}
