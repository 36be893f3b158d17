//! Question answering over a single ingested document.

use std::time::Instant;

use kbase_core::{
    ANSWER_SYSTEM_PROMPT, AnswerProvider, Context, EmbedFailurePolicy, EmbeddingProvider, Error,
    KbaseConfig, Query, Response, Result,
};
use serde::Serialize;

use crate::chunking::{ChunkConfig, split_document};
use crate::embedding::ChunkEmbedder;
use crate::store::{DocumentIndex, SearchHit};

/// Default number of chunks passed to the answer model.
pub const DEFAULT_TOP_K: usize = 3;
/// Default embedding length, matching `text-embedding-ada-002`.
pub const DEFAULT_DIMENSIONS: usize = 1536;

/// An answer together with the chunks it was generated from.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Model output
    pub response: Response,
    /// Retrieved chunks, most relevant first
    pub sources: Vec<SearchHit>,
}

/// Chunk, embed, retrieve, answer.
///
/// The pipeline owns its two collaborators explicitly; nothing is read from
/// process-wide state. One pipeline can serve any number of indexes.
pub struct QaPipeline<E: EmbeddingProvider, A: AnswerProvider> {
    /// Produces vectors for chunks and questions
    embedder: E,
    /// Synthesizes answers from retrieved chunks
    answerer: A,
    /// Chunking parameters
    chunk_config: ChunkConfig,
    /// Chunks retrieved per question
    top_k: usize,
    /// Embedding failure handling
    policy: EmbedFailurePolicy,
    /// Zero-vector length used by [`EmbedFailurePolicy::ZeroVector`]
    dimensions: usize,
}

impl<E: EmbeddingProvider, A: AnswerProvider> QaPipeline<E, A> {
    /// Creates a pipeline with default settings.
    pub fn new(embedder: E, answerer: A) -> Self {
        Self {
            embedder,
            answerer,
            chunk_config: ChunkConfig::default(),
            top_k: DEFAULT_TOP_K,
            policy: EmbedFailurePolicy::default(),
            dimensions: DEFAULT_DIMENSIONS,
        }
    }

    /// Creates a pipeline using the chunking, retrieval, and embedding sections of `config`.
    ///
    /// # Errors
    /// Returns an error if the chunking settings are invalid.
    pub fn from_config(embedder: E, answerer: A, config: &KbaseConfig) -> Result<Self> {
        Ok(Self::new(embedder, answerer)
            .with_chunk_config(ChunkConfig::from_settings(&config.chunking)?)
            .with_top_k(config.retrieval.top_k)
            .with_failure_policy(config.embedding.on_failure, config.embedding.dimensions))
    }

    /// Sets the chunking parameters.
    #[must_use]
    pub fn with_chunk_config(mut self, chunk_config: ChunkConfig) -> Self {
        self.chunk_config = chunk_config;
        self
    }

    /// Sets how many chunks are retrieved per question.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the embedding failure policy and the zero-vector length.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: EmbedFailurePolicy, dimensions: usize) -> Self {
        self.policy = policy;
        self.dimensions = dimensions;
        self
    }

    /// Chunking parameters in use.
    pub const fn chunk_config(&self) -> &ChunkConfig {
        &self.chunk_config
    }

    /// Chunks retrieved per question.
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Splits `text` into chunks and embeds each one.
    ///
    /// # Errors
    /// Returns an error if embedding fails under [`EmbedFailurePolicy::Propagate`].
    pub async fn ingest(&self, text: &str) -> Result<DocumentIndex> {
        let start = Instant::now();
        let chunks = split_document(text, &self.chunk_config);
        let embeddings = self.chunk_embedder().embed_all(&chunks).await?;
        let index = DocumentIndex::from_parts(chunks, embeddings)?;

        tracing::info!(
            "Indexed {} chunks via {} in {}ms",
            index.len(),
            self.embedder.name(),
            start.elapsed().as_millis()
        );
        Ok(index)
    }

    /// Embeds `question` and returns the best-matching chunks.
    ///
    /// # Errors
    /// Returns an error if embedding fails under [`EmbedFailurePolicy::Propagate`],
    /// or if the question vector does not match the index.
    pub async fn retrieve(&self, index: &DocumentIndex, question: &str) -> Result<Vec<SearchHit>> {
        let query_vector = self.chunk_embedder().embed_text(question).await?;
        let hits = index.search(&query_vector, self.top_k)?;

        tracing::debug!(
            "Retrieved chunks {:?} for question",
            hits.iter().map(|hit| hit.index).collect::<Vec<_>>()
        );
        Ok(hits)
    }

    /// Answers `question` from the chunks of `index`.
    ///
    /// # Errors
    /// Returns [`Error::EmptyIndex`] if nothing has been ingested, and
    /// propagates retrieval and provider errors.
    pub async fn ask(&self, index: &DocumentIndex, question: &str) -> Result<Answer> {
        if index.is_empty() {
            return Err(Error::EmptyIndex);
        }

        let sources = self.retrieve(index, question).await?;
        let context = Context::new(ANSWER_SYSTEM_PROMPT)
            .with_chunks(sources.iter().map(|hit| hit.text.clone()).collect());

        let response = self.answerer.answer(&Query::new(question), &context).await?;
        tracing::info!(
            "Answered via {} in {}ms ({} tokens)",
            response.provider,
            response.latency_ms,
            response.tokens_used.total()
        );

        Ok(Answer { response, sources })
    }

    /// Embedder view over the configured provider and policy.
    const fn chunk_embedder(&self) -> ChunkEmbedder<'_, E> {
        ChunkEmbedder::new(&self.embedder, self.policy, self.dimensions)
    }
}
