use core::result::Result as CoreResult;
use std::io::Error as IoError;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for kbase operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur anywhere in the pipeline.
///
/// Degenerate data (empty documents, empty candidate sets, zero vectors) is
/// never an error. The variants below cover I/O, collaborator failures, and
/// caller-contract violations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// An HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required API key was not found.
    #[error("API key not found: {0}")]
    MissingApiKey(String),

    /// An embedding or answer provider encountered an error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// A provider returned a response that could not be used.
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    /// Chunk size and overlap do not describe a positive stride.
    #[error("Invalid chunk configuration: chunk_size={chunk_size}, overlap={overlap} ({reason})")]
    InvalidChunkConfig {
        /// Requested chunk size in characters.
        chunk_size: usize,
        /// Requested overlap in characters.
        overlap: usize,
        /// Which rule was broken.
        reason: &'static str,
    },

    /// A candidate vector does not share the query's dimensionality.
    #[error("Dimension mismatch at candidate {index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Position of the offending candidate.
        index: usize,
        /// Dimensionality of the query vector.
        expected: usize,
        /// Dimensionality of the candidate.
        actual: usize,
    },

    /// A vector contains NaN or an infinity. `None` designates the query.
    #[error("Non-finite component in {}", describe_vector(*.index))]
    NonFiniteVector {
        /// Position of the offending candidate, or `None` for the query.
        index: Option<usize>,
    },

    /// Chunks and embeddings are not index-aligned.
    #[error("Length mismatch: {chunks} chunks but {embeddings} embeddings")]
    LengthMismatch {
        /// Number of chunks supplied.
        chunks: usize,
        /// Number of embeddings supplied.
        embeddings: usize,
    },

    /// A question was asked before any document was ingested.
    #[error("The knowledge base is empty; load a document first")]
    EmptyIndex,

    /// The specified file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

/// Renders the subject of a [`Error::NonFiniteVector`].
fn describe_vector(index: Option<usize>) -> String {
    index.map_or_else(|| "query vector".to_owned(), |position| format!("candidate {position}"))
}
