//! Document loading and Markdown-to-text conversion.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use kbase_core::{Error, Result};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// File extensions treated as Markdown.
const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Reads a document from disk as plain text.
///
/// Markdown files (`.md`, `.markdown`) are converted with [`markdown_to_text`];
/// anything else is returned as-is.
///
/// # Errors
/// Returns [`Error::FileNotFound`] if `path` is not a file and [`Error::Io`]
/// if it cannot be read as UTF-8.
pub fn load_document(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    let contents = fs::read_to_string(path)?;
    let text = if is_markdown(path) {
        markdown_to_text(&contents)
    } else {
        contents
    };

    tracing::info!(
        "Loaded {} ({} characters)",
        path.display(),
        text.chars().count()
    );
    Ok(text)
}

/// Whether `path` has a Markdown extension.
fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|extension| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
        })
}

/// Converts Markdown to plain text that keeps paragraph structure.
///
/// Headings keep their `#` prefix, list items become `- ` lines, emphasis
/// and inline code keep their markers, and links are reduced to their text.
/// Raw HTML is dropped. Every block ends with a blank line, and runs of
/// blank lines collapse to one so the chunker sees one `\n\n` per boundary.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut output = String::with_capacity(markdown.len());
    let mut list_depth = 0_usize;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                start_line(&mut output);
                output.push_str(&"#".repeat(level as usize));
                output.push(' ');
            }
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    end_block(&mut output);
                }
            }
            Event::Start(Tag::Item) => {
                start_line(&mut output);
                output.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                output.push_str("- ");
            }
            Event::End(TagEnd::Item) | Event::SoftBreak | Event::HardBreak => output.push('\n'),
            Event::End(TagEnd::Heading(_) | TagEnd::Paragraph | TagEnd::CodeBlock) | Event::Rule => {
                end_block(&mut output);
            }
            Event::Start(Tag::Emphasis) | Event::End(TagEnd::Emphasis) => output.push('*'),
            Event::Start(Tag::Strong) | Event::End(TagEnd::Strong) => output.push_str("**"),
            Event::Code(code) => {
                output.push('`');
                output.push_str(&code);
                output.push('`');
            }
            Event::Text(text) => output.push_str(&text),
            _ => {}
        }
    }

    collapse_blank_lines(&output)
}

/// Moves to the start of a fresh line unless already there.
fn start_line(output: &mut String) {
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
}

/// Terminates a block with a blank line.
fn end_block(output: &mut String) {
    output.push_str("\n\n");
}

/// Trims trailing whitespace per line, drops leading and trailing blank lines,
/// and collapses interior runs of blank lines to a single one.
fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;

    for line in text.lines() {
        let line = line.trim_end();
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        lines.push(line);
        previous_blank = blank;
    }

    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}
