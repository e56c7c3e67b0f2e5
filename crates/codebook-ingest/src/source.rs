use anyhow::Result;
use std::path::Path;

use codebook_core::error::Error;
use codebook_core::types::ChapterSource;

/// Load every `chapter_<N>.json` extractor file under `dir`, sorted by
/// chapter number. A file that cannot be read or does not deserialize is a
/// `CorruptChunkFile` error, never a silent skip.
pub fn load_chapter_sources(dir: &Path) -> Result<Vec<ChapterSource>> {
    let mut sources = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if !name.starts_with("chapter_") || !name.ends_with(".json") {
            continue;
        }
        let raw = std::fs::read_to_string(path).map_err(|e| Error::CorruptChunkFile {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let source: ChapterSource = serde_json::from_str(&raw).map_err(|e| Error::CorruptChunkFile {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        sources.push(source);
    }
    sources.sort_by_key(|s| s.chapter);
    Ok(sources)
}
