//! Retrieval pipeline: chunking, ranking, and question answering over one document.
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        clippy::float_cmp,
        reason = "Test allows"
    )
)]

pub mod chunking;
pub mod embedding;
pub mod loader;
pub mod pipeline;
pub mod retrieval;
pub mod store;

pub use chunking::{
    ChunkConfig, RECURSIVE_SEPARATORS, split_document, split_recursive, split_text, split_windows,
};
pub use embedding::ChunkEmbedder;
pub use loader::{load_document, markdown_to_text};
pub use pipeline::{Answer, QaPipeline};
pub use retrieval::{ScoredIndex, cosine_similarity, rank, rank_scored};
pub use store::{DocumentIndex, IndexedChunk, SearchHit};
