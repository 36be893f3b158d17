//! Core types and traits for the kbase question-answering pipeline.
//!
//! This crate provides the error type, the collaborator traits for embedding
//! and answer synthesis, shared value types, and configuration loading.

/// Configuration file handling.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Prompt templates for answer synthesis.
pub mod prompts;
/// Synchronization helpers.
pub mod sync;
/// Trait definitions for external collaborators.
pub mod traits;
/// Core data types for questions, answers, and context.
pub mod types;

pub use config::{
    AnswerConfig, ApiConfig, ChunkStrategy, ChunkingConfig, EmbedFailurePolicy, EmbeddingBackendKind,
    EmbeddingConfig, KbaseConfig, OllamaConfig, RetrievalConfig,
};
pub use error::{Error, Result};
pub use prompts::{ANSWER_SYSTEM_PROMPT, build_answer_prompt};
pub use sync::IgnoreLock;
pub use traits::{AnswerProvider, EmbeddingProvider};
pub use types::{Context, Embedding, Query, Response, TokenUsage};
