//! Paragraph-aware text chunking with character overlap.
//!
//! All sizes are counted in characters (Unicode scalar values), never bytes,
//! and no slice ever splits a character. Two strategies are available:
//! greedy paragraph packing ([`split_text`]) and recursive separator
//! splitting ([`split_recursive`]); [`split_document`] picks the one named
//! by the config.

mod paragraph;
mod recursive;
mod window;

use kbase_core::{ChunkStrategy, ChunkingConfig, Error, Result};

pub use recursive::{RECURSIVE_SEPARATORS, split_recursive};
pub use window::split_windows;

/// Separator between paragraphs, and between paragraphs joined into one chunk.
pub const PARAGRAPH_DELIMITER: &str = "\n\n";
/// Character length of [`PARAGRAPH_DELIMITER`].
const DELIMITER_CHARS: usize = 2;
/// Default target chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;
/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_OVERLAP: usize = 50;

/// Validated chunk size and overlap, plus the splitting strategy.
///
/// Construction enforces `chunk_size > 0` and `overlap < chunk_size`, so the
/// fixed-window stride is always positive and [`split_text`] is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Trailing characters carried into the next chunk
    overlap: usize,
    /// Strategy used by [`split_document`]
    strategy: ChunkStrategy,
}

impl ChunkConfig {
    /// Creates a config after checking the size/overlap contract.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChunkConfig`] if `chunk_size` is zero or
    /// `overlap` is not smaller than `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidChunkConfig {
                chunk_size,
                overlap,
                reason: "chunk_size must be positive",
            });
        }
        if overlap >= chunk_size {
            return Err(Error::InvalidChunkConfig {
                chunk_size,
                overlap,
                reason: "overlap must be smaller than chunk_size",
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
            strategy: ChunkStrategy::Paragraph,
        })
    }

    /// Selects the strategy used by [`split_document`].
    #[must_use]
    pub fn with_strategy(mut self, strategy: ChunkStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builds a config from the `[chunking]` section of the config file.
    ///
    /// # Errors
    /// Same as [`ChunkConfig::new`].
    pub fn from_settings(settings: &ChunkingConfig) -> Result<Self> {
        Ok(Self::new(settings.chunk_size, settings.overlap)?.with_strategy(settings.strategy))
    }

    /// Target chunk size in characters.
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap in characters.
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Splitting strategy.
    pub const fn strategy(&self) -> ChunkStrategy {
        self.strategy
    }

    /// Distance between the starts of consecutive fixed windows. Always positive.
    pub const fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            strategy: ChunkStrategy::Paragraph,
        }
    }
}

/// Splits `text` into ordered, overlapping chunks of roughly `chunk_size` characters.
///
/// Text that already fits is returned unchanged as a single chunk, even when
/// empty. Longer text is split on blank lines and paragraphs are packed
/// greedily; a paragraph is never cut, so one oversized paragraph becomes an
/// oversized chunk. Each new chunk starts with the last `overlap` characters
/// of the previous one. Chunks are trimmed, and chunks that trim to nothing
/// are dropped.
///
/// If the paragraph pass yields nothing, [`split_windows`] is used instead.
pub fn split_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    if char_len(text) <= config.chunk_size {
        return vec![text.to_owned()];
    }

    let chunks = paragraph::pack_paragraphs(text, config);
    if !chunks.is_empty() {
        return chunks;
    }

    tracing::debug!("Paragraph packing produced no chunks, falling back to fixed windows");
    split_windows(text, config)
}

/// Splits `text` with the strategy named by `config`.
///
/// Both strategies return text that already fits unchanged as a single chunk.
pub fn split_document(text: &str, config: &ChunkConfig) -> Vec<String> {
    match config.strategy() {
        ChunkStrategy::Paragraph => split_text(text, config),
        ChunkStrategy::Recursive => split_recursive(text, config),
    }
}

/// Length of `text` in characters.
fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The last `count` characters of `text`, or all of it when shorter.
fn tail_chars(text: &str, count: usize) -> &str {
    if count == 0 {
        return "";
    }
    text.char_indices()
        .rev()
        .nth(count - 1)
        .map_or(text, |(offset, _)| &text[offset..])
}

/// Trimmed copy of `text`, or `None` if nothing is left.
fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
