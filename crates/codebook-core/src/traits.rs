/// Embedding collaborator. Implementations must return L2-normalized
/// vectors of a fixed dimensionality and be deterministic for a fixed
/// input, so that repeated queries against a fixed index rank identically.
pub trait Embedder: Send + Sync {
    /// Embedding dimensionality.
    fn dim(&self) -> usize;
    /// Stable model identifier, used to key persisted indexes.
    fn model_id(&self) -> &str;
    /// Compute embeddings for a batch of input texts.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}
