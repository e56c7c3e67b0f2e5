use codebook_core::types::ScoredChunk;

/// Join the final chunk set's text with single spaces, preserving input
/// order. Empty input yields the empty string; the pipeline treats that as
/// "no content available" and never invokes generation on it.
pub fn assemble(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
