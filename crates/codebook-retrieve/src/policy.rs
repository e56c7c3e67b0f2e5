//! Maps the coarse user-facing answer-length selector to retrieval
//! parameters.

use codebook_core::types::RetrievalConfig;

/// Re-ranking engages only when the merged pool holds more than this many
/// chunks. Fixed, independent of `top_k_total`.
pub const RERANK_THRESHOLD: usize = 10;

/// Global cap used by the re-ranker. Identical for every length label.
pub const TOP_K_TOTAL: usize = 10;

/// How many candidate chapters the selector returns.
pub const CHAPTER_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerLength {
    VeryShort,
    Short,
    Long,
    VeryLong,
    Default,
}

impl AnswerLength {
    pub const ALL: [AnswerLength; 5] = [
        AnswerLength::VeryShort,
        AnswerLength::Short,
        AnswerLength::Long,
        AnswerLength::VeryLong,
        AnswerLength::Default,
    ];

    /// Unrecognized labels fall back to `Default`, never an error.
    pub fn parse(label: &str) -> Self {
        match label {
            "Very Short" => AnswerLength::VeryShort,
            "Short" => AnswerLength::Short,
            "Long" => AnswerLength::Long,
            "Very Long" => AnswerLength::VeryLong,
            _ => AnswerLength::Default,
        }
    }

    pub fn retrieval_config(self) -> RetrievalConfig {
        let (chunk_size, chunk_overlap, top_k_per_chapter) = match self {
            AnswerLength::VeryShort => (800, 150, 2),
            AnswerLength::Short => (800, 150, 3),
            AnswerLength::Long => (800, 150, 4),
            AnswerLength::VeryLong => (800, 150, 5),
            AnswerLength::Default => (1000, 100, 6),
        };
        RetrievalConfig { chunk_size, chunk_overlap, top_k_per_chapter, top_k_total: TOP_K_TOTAL }
    }
}

/// Distinct (chunk_size, chunk_overlap) pairs across every label. The
/// offline build creates one index family per pair so any label can be
/// served.
pub fn chunk_configs() -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for length in AnswerLength::ALL {
        let cfg = length.retrieval_config();
        let pair = (cfg.chunk_size, cfg.chunk_overlap);
        if !out.contains(&pair) {
            out.push(pair);
        }
    }
    out
}
