use anyhow::Result;
use arrow_array::{FixedSizeListArray, Int32Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

use codebook_core::types::Chunk;

/// Arrow schema of a per-chapter chunk table. The vector width is the
/// embedder's dimensionality, fixed per database.
pub fn build_chunk_schema(dim: i32) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("chapter", DataType::Int32, false),
        Field::new("chunk_index", DataType::Int32, false),
        Field::new("content", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim),
            true,
        ),
    ]))
}

pub fn chunks_to_record_batch(
    chunks: &[Chunk],
    embeddings: &[Vec<f32>],
    dim: i32,
) -> Result<RecordBatch> {
    let schema = build_chunk_schema(dim);
    let mut chapters = Vec::new();
    let mut chunk_indices = Vec::new();
    let mut contents = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
    for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
        chapters.push(chunk.chapter as i32);
        chunk_indices.push(chunk.chunk_index as i32);
        contents.push(chunk.content.clone());
        vectors.push(Some(embedding.iter().map(|&x| Some(x)).collect()));
    }
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(chapters)),
            Arc::new(Int32Array::from(chunk_indices)),
            Arc::new(StringArray::from(contents)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(
                vectors.into_iter(),
                dim,
            )),
        ],
    )?;
    Ok(batch)
}
