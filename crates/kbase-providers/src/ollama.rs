use kbase_core::{Embedding, EmbeddingProvider, Error, OllamaConfig, Result};
use ollama_rs::Ollama;
use ollama_rs::generation::embeddings::request::GenerateEmbeddingsRequest;
use reqwest::Url;

/// Embedding client for a local Ollama server.
pub struct OllamaEmbeddingClient {
    /// Ollama API handle.
    ollama: Ollama,
    /// Embedding model name.
    model: String,
}

impl OllamaEmbeddingClient {
    /// Creates a client for `host:port` using `model`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `host` is not a valid URL.
    pub fn new(host: &str, port: u16, model: String) -> Result<Self> {
        let url = Url::parse(host)
            .map_err(|error| Error::Config(format!("Invalid Ollama host '{host}': {error}")))?;

        Ok(Self {
            ollama: Ollama::new(url, port),
            model,
        })
    }

    /// Creates a client from the `[ollama]` config section.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the configured host is not a valid URL.
    pub fn from_config(config: &OllamaConfig) -> Result<Self> {
        Self::new(&config.host, config.port, config.model.clone())
    }

    /// Embedding model in use.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl EmbeddingProvider for OllamaEmbeddingClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn ensure_ready(&self) -> Result<()> {
        let models = self.ollama.list_local_models().await.map_err(|error| {
            Error::Provider(format!(
                "Failed to connect to Ollama: {error}. Ensure Ollama is installed and running (ollama serve)"
            ))
        })?;

        if models.iter().any(|model| model.name.contains(&self.model)) {
            Ok(())
        } else {
            Err(Error::Provider(format!(
                "Embedding model '{}' not found. Run: ollama pull {}",
                self.model, self.model
            )))
        }
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let request = GenerateEmbeddingsRequest::new(self.model.clone(), text.to_owned().into());

        let response = self
            .ollama
            .generate_embeddings(request)
            .await
            .map_err(|error| Error::Provider(format!("Ollama embedding failed: {error}")))?;

        // One input, one vector
        response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("No embeddings returned".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let client = OllamaEmbeddingClient::from_config(&OllamaConfig::default()).expect("client");
        assert_eq!(client.model(), "nomic-embed-text");
        assert_eq!(client.name(), "ollama");
    }

    #[test]
    fn test_invalid_host_rejected() {
        let result = OllamaEmbeddingClient::new("not a url", 11434, "model".to_owned());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_provider_error() {
        // Port 9 (discard) is not an Ollama server
        let client =
            OllamaEmbeddingClient::new("http://127.0.0.1", 9, "model".to_owned()).expect("client");
        assert!(matches!(client.embed("hello").await, Err(Error::Provider(_))));
        assert!(matches!(client.ensure_ready().await, Err(Error::Provider(_))));
    }
}
