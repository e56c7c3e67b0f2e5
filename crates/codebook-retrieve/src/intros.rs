use anyhow::Result;

use codebook_core::types::ChapterIntro;

static CHAPTER_INTROS_JSON: &str = include_str!("../data/chapter_intros.json");

/// The static chapter-introduction corpus: one short summary per chapter,
/// shipped with the crate. Used only for routing queries to chapters.
pub fn chapter_intros() -> Result<Vec<ChapterIntro>> {
    Ok(serde_json::from_str(CHAPTER_INTROS_JSON)?)
}
