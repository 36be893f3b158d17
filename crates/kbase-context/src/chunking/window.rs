//! Fixed-stride character windows.

use core::iter::once;

use super::ChunkConfig;

/// Slices `text` into windows of `chunk_size` characters, one every `stride` characters.
///
/// Windows start at 0, `stride`, `2 * stride`, ... for as long as the start
/// lies inside the text; the last windows are clipped at the end of the text.
/// Windows are not trimmed, but windows that are entirely whitespace are skipped.
pub fn split_windows(text: &str, config: &ChunkConfig) -> Vec<String> {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(once(text.len()))
        .collect();
    let total_chars = boundaries.len() - 1;

    (0..total_chars)
        .step_by(config.stride())
        .filter_map(|start| {
            let end = (start + config.chunk_size()).min(total_chars);
            let window = &text[boundaries[start]..boundaries[end]];
            (!window.trim().is_empty()).then(|| window.to_owned())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_advance_by_stride() {
        let config = ChunkConfig::new(4, 1).expect("valid config");
        let windows = split_windows("abcdefghij", &config);
        assert_eq!(windows, vec!["abcd", "defg", "ghij", "j"]);
    }

    #[test]
    fn test_windows_without_overlap() {
        let config = ChunkConfig::new(5, 0).expect("valid config");
        assert_eq!(split_windows("abcdefghij", &config), vec!["abcde", "fghij"]);
    }

    #[test]
    fn test_windows_respect_char_boundaries() {
        let config = ChunkConfig::new(2, 0).expect("valid config");
        assert_eq!(split_windows("ÄÖÜß", &config), vec!["ÄÖ", "Üß"]);
    }

    #[test]
    fn test_blank_windows_skipped() {
        let config = ChunkConfig::new(3, 0).expect("valid config");
        assert_eq!(split_windows("abc      xyz", &config), vec!["abc", "xyz"]);
    }

    #[test]
    fn test_empty_text_has_no_windows() {
        assert!(split_windows("", &ChunkConfig::default()).is_empty());
    }
}
