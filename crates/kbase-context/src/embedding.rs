//! Embedding with a named failure policy.

use kbase_core::{EmbedFailurePolicy, Embedding, EmbeddingProvider, Result};

/// Text sent to the provider in place of empty or whitespace-only input.
pub const EMPTY_TEXT_PLACEHOLDER: &str = "empty";

/// Wraps an [`EmbeddingProvider`] with the placeholder rule and a failure policy.
pub struct ChunkEmbedder<'provider, P: EmbeddingProvider> {
    /// Underlying provider
    provider: &'provider P,
    /// What to do when the provider fails
    policy: EmbedFailurePolicy,
    /// Length of the zero vector substituted on failure
    dimensions: usize,
}

impl<'provider, P: EmbeddingProvider> ChunkEmbedder<'provider, P> {
    /// Creates an embedder over `provider`.
    pub const fn new(
        provider: &'provider P,
        policy: EmbedFailurePolicy,
        dimensions: usize,
    ) -> Self {
        Self {
            provider,
            policy,
            dimensions,
        }
    }

    /// Embeds one text.
    ///
    /// Blank text is replaced by [`EMPTY_TEXT_PLACEHOLDER`]. A provider failure
    /// becomes a zero vector under [`EmbedFailurePolicy::ZeroVector`].
    ///
    /// # Errors
    /// Returns the provider error under [`EmbedFailurePolicy::Propagate`].
    pub async fn embed_text(&self, text: &str) -> Result<Embedding> {
        let input = if text.trim().is_empty() {
            EMPTY_TEXT_PLACEHOLDER
        } else {
            text
        };

        match self.provider.embed(input).await {
            Ok(embedding) => Ok(embedding),
            Err(error) => match self.policy {
                EmbedFailurePolicy::ZeroVector => {
                    tracing::warn!(
                        "Embedding via {} failed, substituting zero vector: {error}",
                        self.provider.name()
                    );
                    Ok(vec![0.0; self.dimensions])
                }
                EmbedFailurePolicy::Propagate => Err(error),
            },
        }
    }

    /// Embeds every chunk in order, one provider call at a time.
    ///
    /// # Errors
    /// Returns the first provider error under [`EmbedFailurePolicy::Propagate`].
    pub async fn embed_all(&self, chunks: &[String]) -> Result<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            embeddings.push(self.embed_text(chunk).await?);
        }
        tracing::debug!("Embedded {} chunks", embeddings.len());
        Ok(embeddings)
    }
}
