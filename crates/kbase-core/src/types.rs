use serde::{Deserialize, Serialize};

/// A single embedding vector.
pub type Embedding = Vec<f32>;

/// A question addressed to the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Question text as typed by the user.
    pub text: String,
}

impl Query {
    /// Creates a query from any string-like value.
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self { text: text.into() }
    }
}

/// Text generated by an answer provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Generated answer text.
    pub text: String,
    /// Token accounting reported by the provider.
    pub tokens_used: TokenUsage,
    /// Provider and model that produced the answer.
    pub provider: String,
    /// Wall-clock time spent waiting for the provider.
    pub latency_ms: u64,
}

/// Token accounting for a single provider call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens.
    pub input: u64,
    /// Completion tokens.
    pub output: u64,
}

impl TokenUsage {
    /// Total tokens billed for the call.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

/// Retrieved material handed to the answer provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// Retrieved chunk texts, most relevant first.
    pub chunks: Vec<String>,
    /// System prompt for the answering model.
    pub system_prompt: String,
}

impl Context {
    /// Creates an empty context with the given system prompt.
    pub fn new<T: Into<String>>(system_prompt: T) -> Self {
        Self {
            chunks: Vec::new(),
            system_prompt: system_prompt.into(),
        }
    }

    /// Attaches retrieved chunks to the context.
    #[must_use]
    pub fn with_chunks(mut self, chunks: Vec<String>) -> Self {
        self.chunks = chunks;
        self
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_chunk_order() {
        let context = Context::new("sys").with_chunks(vec!["beta".to_owned(), "alpha".to_owned()]);
        assert_eq!(context.chunks, vec!["beta".to_owned(), "alpha".to_owned()]);
        assert_eq!(context.system_prompt, "sys");
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            input: 12,
            output: 30,
        };
        assert_eq!(usage.total(), 42);
        assert_eq!(TokenUsage::default().total(), 0);
    }
}
