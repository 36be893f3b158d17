//! Greedy paragraph packing.

use std::mem::take;

use super::{ChunkConfig, DELIMITER_CHARS, PARAGRAPH_DELIMITER, char_len, non_blank, tail_chars};

/// Chunk under construction, with its length cached in characters.
#[derive(Default)]
struct ChunkBuffer {
    /// Accumulated text, untrimmed
    text: String,
    /// `text` length in characters
    chars: usize,
}

impl ChunkBuffer {
    /// Whether `paragraph` (plus a delimiter) would push the buffer past `budget`.
    fn would_overflow(&self, paragraph_chars: usize, budget: usize) -> bool {
        !self.text.is_empty() && self.chars + paragraph_chars + DELIMITER_CHARS > budget
    }

    /// Appends a paragraph, joining with the delimiter when the buffer is non-empty.
    fn push_paragraph(&mut self, paragraph: &str, paragraph_chars: usize) {
        if !self.text.is_empty() {
            self.text.push_str(PARAGRAPH_DELIMITER);
            self.chars += DELIMITER_CHARS;
        }
        self.text.push_str(paragraph);
        self.chars += paragraph_chars;
    }

    /// Closes the current chunk and reseeds the buffer with its trailing `overlap` characters.
    ///
    /// Returns the trimmed chunk, or `None` if it trims to nothing.
    fn close(&mut self, overlap: usize) -> Option<String> {
        let closed = take(&mut self.text);
        self.text = tail_chars(&closed, overlap).to_owned();
        self.chars = self.chars.min(overlap);
        non_blank(&closed)
    }

    /// Consumes the buffer, returning the trimmed final chunk if any.
    fn finish(self) -> Option<String> {
        non_blank(&self.text)
    }
}

/// Packs paragraphs into chunks no larger than `chunk_size` where possible.
pub(super) fn pack_paragraphs(text: &str, config: &ChunkConfig) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer = ChunkBuffer::default();

    for paragraph in text.split(PARAGRAPH_DELIMITER) {
        let paragraph_chars = char_len(paragraph);

        if buffer.would_overflow(paragraph_chars, config.chunk_size())
            && let Some(chunk) = buffer.close(config.overlap())
        {
            chunks.push(chunk);
        }

        buffer.push_paragraph(paragraph, paragraph_chars);
    }

    if let Some(chunk) = buffer.finish() {
        chunks.push(chunk);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_reseeds_with_tail() {
        let mut buffer = ChunkBuffer::default();
        buffer.push_paragraph("hello world", 11);
        assert_eq!(buffer.close(5), Some("hello world".to_owned()));
        assert_eq!(buffer.text, "world");
        assert_eq!(buffer.chars, 5);
    }

    #[test]
    fn test_close_with_overlap_longer_than_buffer() {
        let mut buffer = ChunkBuffer::default();
        buffer.push_paragraph("abc", 3);
        assert_eq!(buffer.close(10), Some("abc".to_owned()));
        assert_eq!(buffer.text, "abc");
        assert_eq!(buffer.chars, 3);
    }

    #[test]
    fn test_blank_buffer_closes_to_none() {
        let mut buffer = ChunkBuffer::default();
        buffer.push_paragraph("   ", 3);
        assert_eq!(buffer.close(0), None);
        assert!(buffer.text.is_empty());
    }

    #[test]
    fn test_overflow_needs_non_empty_buffer() {
        let buffer = ChunkBuffer::default();
        assert!(!buffer.would_overflow(1_000, 10));
    }

    #[test]
    fn test_empty_paragraphs_keep_delimiters() {
        let config = ChunkConfig::new(100, 0).expect("valid config");
        let chunks = pack_paragraphs("one\n\n\n\ntwo", &config);
        assert_eq!(chunks, vec!["one\n\n\n\ntwo"]);
    }
}
