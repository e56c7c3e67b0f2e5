use codebook_core::types::Chunk;

/// Split `text` into overlapping windows of `chunk_size` characters with
/// `chunk_overlap` characters shared between neighbors. The final window may
/// be shorter. Windows are trimmed and whitespace-only windows are dropped,
/// so a chapter with no printable content yields no chunks at all.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    assert!(chunk_size > 0, "chunk_size must be positive");
    assert!(chunk_overlap < chunk_size, "overlap must be smaller than the window");
    let stride = chunk_size - chunk_overlap;

    let char_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let total = char_starts.len();
    let mut windows = Vec::new();
    let mut start = 0usize;
    while start < total {
        let end = (start + chunk_size).min(total);
        let byte_start = char_starts[start];
        let byte_end = if end == total { text.len() } else { char_starts[end] };
        let window = text[byte_start..byte_end].trim();
        if !window.is_empty() {
            windows.push(window.to_string());
        }
        if end == total {
            break;
        }
        start += stride;
    }
    windows
}

/// Window one chapter's content and tag each window with its position.
/// Chunk indexes are 1-based within the chapter.
pub fn chunk_chapter(chapter: u32, data: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<Chunk> {
    split_text(data, chunk_size, chunk_overlap)
        .into_iter()
        .enumerate()
        .map(|(i, content)| Chunk { chapter, chunk_index: i + 1, content })
        .collect()
}
