/// Flatten one chapter's extracted tables into a single text block that the
/// window chunker can treat like running text. Each table becomes a labeled
/// block with one ` | `-joined line per row.
pub fn flatten_tables(chapter: u32, tables: &[Vec<Vec<String>>]) -> String {
    let mut blocks = Vec::new();
    for (i, table) in tables.iter().enumerate() {
        let rows: Vec<String> = table
            .iter()
            .map(|row| {
                row.iter()
                    .map(String::as_str)
                    .filter(|cell| !cell.is_empty())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect();
        blocks.push(format!("Chapter_{}_Table_{}:\n{}", chapter, i + 1, rows.join("\n")));
    }
    blocks.join("\n\n")
}
