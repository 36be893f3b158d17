//! Provider adapters for embedding and answer services.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::float_cmp,
        reason = "Test allows"
    )
)]

/// Runtime selection of the embedding backend.
pub mod backend;
/// Canned providers for tests.
pub mod mock;
/// Local Ollama embedding client.
pub mod ollama;
/// OpenAI-compatible embeddings and chat completions.
pub mod openai;

pub use backend::EmbeddingBackend;
pub use mock::{MockCall, MockProvider, StubEmbedder};
pub use ollama::OllamaEmbeddingClient;
pub use openai::{OpenAiProvider, normalize_base_url};
