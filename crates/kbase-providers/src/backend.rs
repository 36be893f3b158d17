use kbase_core::{Embedding, EmbeddingBackendKind, EmbeddingProvider, KbaseConfig, Result};

use crate::{OllamaEmbeddingClient, OpenAiProvider};

/// Embedding provider chosen at runtime from configuration.
pub enum EmbeddingBackend {
    /// OpenAI-compatible `/embeddings` endpoint.
    OpenAi(OpenAiProvider),
    /// Local Ollama server.
    Ollama(OllamaEmbeddingClient),
}

impl EmbeddingBackend {
    /// Builds the backend named by `embedding.backend`.
    ///
    /// # Errors
    /// Returns an error if the selected backend is misconfigured, for example
    /// when the OpenAI backend has no API key.
    pub fn from_config(config: &KbaseConfig) -> Result<Self> {
        match config.embedding.backend {
            EmbeddingBackendKind::OpenAi => Ok(Self::OpenAi(OpenAiProvider::from_config(config)?)),
            EmbeddingBackendKind::Ollama => Ok(Self::Ollama(OllamaEmbeddingClient::from_config(
                &config.ollama,
            )?)),
        }
    }

    /// Embedding model the backend sends requests for.
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi(provider) => provider.embedding_model(),
            Self::Ollama(client) => client.model(),
        }
    }
}

impl EmbeddingProvider for EmbeddingBackend {
    fn name(&self) -> &'static str {
        match self {
            Self::OpenAi(provider) => EmbeddingProvider::name(provider),
            Self::Ollama(client) => client.name(),
        }
    }

    async fn ensure_ready(&self) -> Result<()> {
        match self {
            Self::OpenAi(provider) => provider.ensure_ready().await,
            Self::Ollama(client) => client.ensure_ready().await,
        }
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        match self {
            Self::OpenAi(provider) => provider.embed(text).await,
            Self::Ollama(client) => client.embed(text).await,
        }
    }
}
