//! Prompt templates
//!
//! Prompt files live in the central `prompts/` directory as markdown documents
//! with Usage and Prompt sections, and are embedded at compile time using
//! `include_str!`.

use crate::{Error, Result};

/// Answer synthesis template, with `{context}` and `{question}` placeholders.
const ANSWER_MD: &str = include_str!("../../../../prompts/answer.md");

/// System message sent alongside the rendered answer prompt.
pub const ANSWER_SYSTEM_PROMPT: &str =
    "You are a knowledge-base assistant that answers questions from the supplied context.";

/// Placeholder replaced by the joined context chunks.
const CONTEXT_SLOT: &str = "{context}";
/// Placeholder replaced by the question.
const QUESTION_SLOT: &str = "{question}";

/// Renders the answer prompt for `question` over `context_chunks`.
///
/// Chunks are joined with a blank line in the order given.
///
/// # Errors
/// Returns an error if the embedded template has no Prompt section.
pub fn build_answer_prompt(question: &str, context_chunks: &[String]) -> Result<String> {
    let template = extract_prompt_section(ANSWER_MD)?;
    let context = context_chunks.join("\n\n");
    Ok(fill_slots(&template, &[(CONTEXT_SLOT, &context), (QUESTION_SLOT, question)]))
}

/// Replaces every slot in `template` in one left-to-right pass.
///
/// Substituted values are never rescanned, so placeholder text inside a
/// question or chunk is copied through literally.
fn fill_slots(template: &str, slots: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = slots
            .iter()
            .filter_map(|&(slot, value)| rest.find(slot).map(|position| (position, slot, value)))
            .min_by_key(|&(position, _, _)| position);

        let Some((position, slot, value)) = next else {
            rendered.push_str(rest);
            return rendered;
        };

        rendered.push_str(&rest[..position]);
        rendered.push_str(value);
        rest = &rest[position + slot.len()..];
    }
}

/// Extracts the Prompt section from a markdown file
///
/// # Errors
/// Returns an error if the Prompt section cannot be found
fn extract_prompt_section(content: &str) -> Result<String> {
    let prompt_start = content
        .find("## Prompt")
        .ok_or_else(|| Error::Config("Prompt section not found".to_owned()))?;

    let prompt_content_start = content[prompt_start..]
        .find('\n')
        .ok_or_else(|| Error::Config("Invalid prompt format".to_owned()))?
        + prompt_start
        + 1;

    // ## Prompt is always the last top-level section
    Ok(content[prompt_content_start..].trim().to_owned())
}
