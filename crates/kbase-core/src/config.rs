//! Configuration types for chunking, retrieval, embedding, and answer synthesis.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Env var consulted when the config file has no API key.
const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Env var consulted when the config file has no API base URL.
const ENV_OPENAI_API_BASE: &str = "OPENAI_API_BASE";

/// Complete kbase configuration.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KbaseConfig {
    /// Chunking parameters
    pub chunking: ChunkingConfig,
    /// Retrieval parameters
    pub retrieval: RetrievalConfig,
    /// Embedding backend and failure policy
    pub embedding: EmbeddingConfig,
    /// Answer model parameters
    pub answer: AnswerConfig,
    /// Credentials and endpoint for the OpenAI-compatible API
    pub api: ApiConfig,
    /// Local Ollama server settings
    pub ollama: OllamaConfig,
}

/// How a document is cut into chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStrategy {
    /// Greedy packing of blank-line separated paragraphs
    #[default]
    Paragraph,
    /// Recursive splitting on blank lines, then newlines, then spaces, then characters
    Recursive,
}

/// Chunking configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Characters repeated between consecutive chunks
    pub overlap: usize,
    /// Splitting strategy
    pub strategy: ChunkStrategy,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
            strategy: ChunkStrategy::Paragraph,
        }
    }
}

/// Retrieval configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks handed to the answer model
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// What to do when the embedding provider fails for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedFailurePolicy {
    /// Substitute a zero vector, which always scores 0.0 and sinks to the bottom.
    #[default]
    ZeroVector,
    /// Return the provider error to the caller.
    Propagate,
}

/// Which service produces embeddings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackendKind {
    /// OpenAI-compatible `/embeddings` endpoint
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

/// Embedding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding backend
    pub backend: EmbeddingBackendKind,
    /// Model name used on the OpenAI-compatible endpoint
    pub model: String,
    /// Expected vector length, used for zero-vector substitution
    pub dimensions: usize,
    /// Failure policy
    pub on_failure: EmbedFailurePolicy,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackendKind::OpenAi,
            model: "text-embedding-ada-002".to_owned(),
            dimensions: 1536,
            on_failure: EmbedFailurePolicy::ZeroVector,
        }
    }
}

/// Answer model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    /// Chat model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum completion tokens
    pub max_tokens: usize,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_owned(),
            temperature: 0.3,
            max_tokens: 800,
        }
    }
}

/// Credentials for the OpenAI-compatible API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API key
    pub api_key: Option<String>,
    /// Custom base URL (for proxies and compatible services)
    pub api_base: Option<String>,
}

/// Ollama server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Host URL without port
    pub host: String,
    /// Port
    pub port: u16,
    /// Embedding model name
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".to_owned(),
            port: 11434,
            model: "nomic-embed-text".to_owned(),
        }
    }
}

impl KbaseConfig {
    /// Get the default config directory path (`~/.kbase`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".kbase"))
    }

    /// Get the default config file path (`~/.kbase/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from `path`, writing the defaults there first if it doesn't exist
    ///
    /// # Errors
    /// Returns an error if the config cannot be read, created, or validated
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            let config = Self::default();
            config.save_to_file(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|error| Error::Config(format!("Failed to read config: {error}")))?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;

        tracing::debug!(
            "Loaded config from {}: api_key={}, backend={:?}",
            path.display(),
            if config.api.api_key.is_some() {
                "present"
            } else {
                "missing"
            },
            config.embedding.backend
        );

        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!("Failed to create config directory: {error}"))
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# kbase configuration file\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))
            .map_err(|error| Error::Config(format!("Failed to write config: {error}")))?;

        Ok(())
    }

    /// Checks the invariants the chunker and retriever rely on.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first offending setting
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be positive".to_owned()));
        }
        if self.chunking.overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be positive".to_owned()));
        }
        if self.embedding.dimensions == 0 {
            return Err(Error::Config("embedding.dimensions must be positive".to_owned()));
        }
        Ok(())
    }

    /// API key from the config file, falling back to `OPENAI_API_KEY`
    pub fn api_key(&self) -> Option<String> {
        self.api
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env::var(ENV_OPENAI_API_KEY).ok())
    }

    /// API base URL from the config file, falling back to `OPENAI_API_BASE`
    pub fn api_base(&self) -> Option<String> {
        self.api
            .api_base
            .clone()
            .filter(|base| !base.trim().is_empty())
            .or_else(|| env::var(ENV_OPENAI_API_BASE).ok())
    }

    /// Copy of this config with the API key masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.api.api_key.is_some() {
            copy.api.api_key = Some("********".to_owned());
        }
        copy
    }
}
