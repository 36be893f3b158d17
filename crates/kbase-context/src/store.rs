//! In-memory chunk store with one embedding per chunk.

use kbase_core::{Embedding, Error, Result};
use serde::Serialize;

use crate::retrieval::rank_scored;

/// A chunk paired with its embedding.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    /// Position of the chunk in the source document
    pub index: usize,
    /// Chunk text
    pub text: String,
    /// Embedding of `text`
    pub embedding: Embedding,
}

/// Search result: a chunk, its position, and its similarity to the question.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    /// Position of the chunk in the source document
    pub index: usize,
    /// Cosine similarity to the query
    pub score: f32,
    /// Chunk text
    pub text: String,
}

/// In-memory vector store for the chunks of a single document.
///
/// Each entry holds its own text and vector, so chunks and embeddings can
/// never drift out of alignment once the index is built.
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    /// Entries in document order
    entries: Vec<IndexedChunk>,
}

impl DocumentIndex {
    /// Pairs chunks with their embeddings.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] if the two sequences differ in length
    /// and [`Error::DimensionMismatch`] if the embeddings disagree on dimensionality.
    pub fn from_parts(chunks: Vec<String>, embeddings: Vec<Embedding>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(Error::LengthMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }

        if let Some(first) = embeddings.first() {
            let expected = first.len();
            if let Some((index, odd)) = embeddings
                .iter()
                .enumerate()
                .find(|(_, embedding)| embedding.len() != expected)
            {
                return Err(Error::DimensionMismatch {
                    index,
                    expected,
                    actual: odd.len(),
                });
            }
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(index, (text, embedding))| IndexedChunk {
                index,
                text,
                embedding,
            })
            .collect();

        Ok(Self { entries })
    }

    /// Returns the best `top_k` chunks for `query`, most similar first.
    ///
    /// # Errors
    /// Returns an error if `query` does not match the stored dimensionality
    /// or contains non-finite values.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        let vectors: Vec<&[f32]> = self
            .entries
            .iter()
            .map(|entry| entry.embedding.as_slice())
            .collect();

        let ranked = rank_scored(query, &vectors, top_k)?;

        Ok(ranked
            .into_iter()
            .filter_map(|scored| {
                self.entries.get(scored.index).map(|entry| SearchHit {
                    index: entry.index,
                    score: scored.score,
                    text: entry.text.clone(),
                })
            })
            .collect())
    }

    /// Get number of stored chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chunk text at `index`
    pub fn chunk(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.text.as_str())
    }

    /// Iterate over all entries in document order
    pub fn iter(&self) -> impl Iterator<Item = &IndexedChunk> + '_ {
        self.entries.iter()
    }
}
