//! Recursive separator splitting.
//!
//! Text is cut on the coarsest separator it contains. Pieces that fit are
//! merged back together up to `chunk_size`, carrying whole trailing pieces
//! of at most `overlap` characters into the next chunk. Pieces that are
//! still too long are split again with the next, finer separator.

use std::collections::VecDeque;

use super::{ChunkConfig, char_len, non_blank};

/// Separators tried in order, coarsest first. The empty separator splits
/// between characters and matches any text.
pub const RECURSIVE_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits `text` on [`RECURSIVE_SEPARATORS`].
///
/// Text that already fits is returned unchanged as a single chunk, even when
/// empty. Otherwise every chunk is trimmed, non-blank, and no longer than
/// `chunk_size` characters.
pub fn split_recursive(text: &str, config: &ChunkConfig) -> Vec<String> {
    if char_len(text) <= config.chunk_size() {
        return vec![text.to_owned()];
    }
    split_with(text, &RECURSIVE_SEPARATORS, config)
}

/// One level of the recursion, using the first applicable separator in `separators`.
fn split_with(text: &str, separators: &[&str], config: &ChunkConfig) -> Vec<String> {
    let (separator, finer) = separators
        .iter()
        .position(|separator| separator.is_empty() || text.contains(separator))
        .map_or(("", &[][..]), |position| {
            (separators[position], &separators[position + 1..])
        });

    let mut chunks = Vec::new();
    let mut fitting = Vec::new();

    for piece in split_pieces(text, separator) {
        if char_len(piece) < config.chunk_size() {
            fitting.push(piece);
            continue;
        }

        if !fitting.is_empty() {
            chunks.extend(merge_pieces(&fitting, separator, config));
            fitting.clear();
        }

        if finer.is_empty() {
            chunks.extend(non_blank(piece));
        } else {
            chunks.extend(split_with(piece, finer, config));
        }
    }

    if !fitting.is_empty() {
        chunks.extend(merge_pieces(&fitting, separator, config));
    }

    chunks
}

/// Non-empty pieces of `text` around `separator`; single characters for the empty separator.
fn split_pieces<'text>(text: &'text str, separator: &str) -> Vec<&'text str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(offset, character)| &text[offset..offset + character.len_utf8()])
            .collect()
    } else {
        text.split(separator).filter(|piece| !piece.is_empty()).collect()
    }
}

/// Joins consecutive pieces with `separator` into chunks of at most `chunk_size` characters.
fn merge_pieces(pieces: &[&str], separator: &str, config: &ChunkConfig) -> Vec<String> {
    let separator_chars = char_len(separator);
    let mut chunks = Vec::new();
    // Pieces of the open chunk with their lengths
    let mut window: VecDeque<(&str, usize)> = VecDeque::new();
    // Length of the open chunk, separators included
    let mut total = 0;

    for &piece in pieces {
        let piece_chars = char_len(piece);
        let joiner = if window.is_empty() { 0 } else { separator_chars };

        if !window.is_empty() && total + piece_chars + joiner > config.chunk_size() {
            chunks.extend(join_window(&window, separator));

            while let Some(&(_, front_chars)) = window.front() {
                let fits = total + piece_chars + separator_chars <= config.chunk_size();
                if total <= config.overlap() && fits {
                    break;
                }
                window.pop_front();
                total -= front_chars + if window.is_empty() { 0 } else { separator_chars };
            }
        }

        total += piece_chars + if window.is_empty() { 0 } else { separator_chars };
        window.push_back((piece, piece_chars));
    }

    chunks.extend(join_window(&window, separator));
    chunks
}

/// The open chunk as trimmed text, or `None` if it is blank.
fn join_window(window: &VecDeque<(&str, usize)>, separator: &str) -> Option<String> {
    let joined = window
        .iter()
        .map(|&(piece, _)| piece)
        .collect::<Vec<_>>()
        .join(separator);
    non_blank(&joined)
}
