use core::future::Future;

use async_trait::async_trait;

use crate::{Context, Embedding, Query, Response, Result};

/// Trait for generating embeddings from text.
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the unique identifier for this provider.
    fn name(&self) -> &'static str;

    /// Ensures the provider is configured and its model is reachable.
    ///
    /// # Errors
    /// Returns an error if the model is not available or the client is not configured.
    fn ensure_ready(&self) -> impl Future<Output = Result<()>> + Send;

    /// Generates an embedding for `text`.
    ///
    /// # Errors
    /// Returns an error if embedding generation fails.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Embedding>> + Send;
}

/// Trait for language-model providers that answer a question from retrieved context.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Returns the unique identifier for this provider.
    fn name(&self) -> &'static str;

    /// Answers `query` using only the chunks carried by `context`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unavailable, the request fails,
    /// or the response cannot be parsed.
    async fn answer(&self, query: &Query, context: &Context) -> Result<Response>;
}
