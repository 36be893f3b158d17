//! Chunker properties: passthrough, ordering, overlap, and empty input.

use kbase_context::{ChunkConfig, split_text};

fn default_config() -> ChunkConfig {
    ChunkConfig::new(500, 50).expect("valid config")
}

/// Paragraph of exactly `len` characters built from a repeating label.
fn paragraph(label: &str, len: usize) -> String {
    label.chars().cycle().take(len).collect()
}

/// Text at or under the chunk size comes back unchanged, whitespace included.
#[test]
fn test_short_text_passthrough() {
    let config = default_config();
    let exactly_full = paragraph("x", 500);
    for text in ["hello", "  padded  \n\n", exactly_full.as_str()] {
        assert_eq!(split_text(text, &config), vec![text.to_owned()]);
    }
}

/// Paragraphs appear in the output in their original order.
#[test]
fn test_paragraph_order_preserved() {
    let paragraphs: Vec<String> = (0..10)
        .map(|number| format!("[para-{number:02}] {}", paragraph("lorem ipsum ", 110)))
        .collect();
    let text = paragraphs.join("\n\n");

    let chunks = split_text(&text, &default_config());
    assert!(chunks.len() > 1, "expected several chunks, got {}", chunks.len());

    let mut last_chunk = 0;
    for number in 0..10 {
        let label = format!("[para-{number:02}]");
        let position = chunks
            .iter()
            .position(|chunk| chunk.contains(&label))
            .unwrap_or_else(|| panic!("{label} missing from output"));
        assert!(position >= last_chunk, "{label} appeared out of order");
        last_chunk = position;
    }
}

/// Two 480-character paragraphs give two chunks; the second starts with the
/// last 50 characters of the first.
#[test]
fn test_overlap_carried_into_next_chunk() {
    let first = paragraph("abcdefghij", 480);
    let second = paragraph("KLMNOPQRST", 480);
    let text = format!("{first}\n\n{second}");

    let chunks = split_text(&text, &default_config());
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], first);

    let tail: String = first.chars().skip(430).collect();
    assert!(chunks[1].starts_with(&tail));
    assert!(chunks[1].ends_with(&second));
}

/// The empty string is its own single chunk.
#[test]
fn test_empty_text() {
    assert_eq!(split_text("", &default_config()), vec![String::new()]);
}

/// Overlap never splits a multibyte character.
#[test]
fn test_multibyte_overlap() {
    let first = paragraph("日本語のテキスト", 300);
    let second = paragraph("ñandú ", 300);
    let text = format!("{first}\n\n{second}");

    let config = ChunkConfig::new(400, 20).expect("valid config");
    let chunks = split_text(&text, &config);
    assert_eq!(chunks.len(), 2);

    let tail: String = first.chars().skip(280).collect();
    assert!(chunks[1].starts_with(&tail));
}

/// Invalid sizes are rejected when building the config.
#[test]
fn test_config_validation() {
    assert!(ChunkConfig::new(0, 0).is_err());
    assert!(ChunkConfig::new(50, 50).is_err());
    assert!(ChunkConfig::new(50, 49).is_ok());
}
