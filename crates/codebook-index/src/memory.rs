//! Transient exact-cosine index. Built over a small corpus (the 44 chapter
//! intros, or one query's candidate pool), queried a handful of times, then
//! dropped. Never persisted.

use codebook_core::traits::Embedder;

pub struct MemoryIndex<T> {
    items: Vec<T>,
    vectors: Vec<Vec<f32>>,
}

impl<T: Clone> MemoryIndex<T> {
    /// Embed every item's text in one batch and keep the vectors alongside
    /// the items. Insertion order is preserved and breaks score ties, so a
    /// fixed corpus + fixed query + fixed embedder ranks identically on
    /// every call.
    pub fn build<F>(embedder: &dyn Embedder, items: Vec<T>, text_of: F) -> anyhow::Result<Self>
    where
        F: Fn(&T) -> &str,
    {
        let texts: Vec<String> = items.iter().map(|i| text_of(i).to_string()).collect();
        let vectors = embedder.embed_batch(&texts)?;
        Ok(Self { items, vectors })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Top-k items by cosine similarity to `query_vec`, best first.
    pub fn query(&self, query_vec: &[f32], k: usize) -> Vec<(T, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine(query_vec, v)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(k)
            .map(|(i, s)| (self.items[i].clone(), s))
            .collect()
    }
}

pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (na * nb).max(1e-6)
}
