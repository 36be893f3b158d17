//! Canned providers for testing the pipeline.
//!
//! [`MockProvider`] answers questions from predefined patterns and
//! [`StubEmbedder`] returns fixed vectors, so the whole chunk, embed,
//! retrieve, answer loop runs without network access.

use async_trait::async_trait;
use kbase_core::{
    AnswerProvider, Context, Embedding, EmbeddingProvider, Error, IgnoreLock as _, Query, Response,
    Result, TokenUsage,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Response storage type
type ResponseMap = Arc<Mutex<HashMap<String, String>>>;

/// One recorded call to [`MockProvider::answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// Question text
    pub question: String,
    /// Context chunks in the order received
    pub chunks: Vec<String>,
}

/// Mock answer provider that returns pre-defined responses based on question patterns.
#[derive(Clone)]
pub struct MockProvider {
    /// Name reported in responses
    name: String,
    /// Predefined responses keyed by question text or substring
    responses: ResponseMap,
    /// Default response if no match found
    default_response: Arc<Mutex<Option<String>>>,
    /// Call history for verification
    call_history: Arc<Mutex<Vec<MockCall>>>,
}

impl MockProvider {
    /// Create a new mock provider with a given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a pattern-based response to the mock provider.
    #[must_use]
    pub fn with_response(self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        {
            let mut responses = self.responses.lock_ignore_poison();
            responses.insert(pattern.into(), response.into());
        }
        self
    }

    /// Set a default response for questions that don't match any pattern.
    #[must_use]
    pub fn with_default_response(self, response: impl Into<String>) -> Self {
        {
            let mut default = self.default_response.lock_ignore_poison();
            *default = Some(response.into());
        }
        self
    }

    /// Get the call history.
    #[must_use]
    pub fn get_call_history(&self) -> Vec<MockCall> {
        let history = self.call_history.lock_ignore_poison();
        history.clone()
    }

    /// Get the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        let history = self.call_history.lock_ignore_poison();
        history.len()
    }

    /// Find a matching response: exact question first, then the
    /// lexicographically smallest pattern contained in the question.
    fn find_response(&self, question: &str) -> Option<String> {
        let responses = self.responses.lock_ignore_poison();

        if let Some(response) = responses.get(question) {
            return Some(response.clone());
        }

        responses
            .iter()
            .filter(|(pattern, _)| question.contains(pattern.as_str()))
            .min_by(|(left, _), (right, _)| left.cmp(right))
            .map(|(_, response)| response.clone())
    }
}

#[async_trait]
impl AnswerProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn answer(&self, query: &Query, context: &Context) -> Result<Response> {
        {
            let mut history = self.call_history.lock_ignore_poison();
            history.push(MockCall {
                question: query.text.clone(),
                chunks: context.chunks.clone(),
            });
        }

        let text = self.find_response(&query.text).unwrap_or_else(|| {
            let default = self.default_response.lock_ignore_poison();
            default
                .clone()
                .unwrap_or_else(|| format!("Mock answer for question: {}", query.text))
        });

        Ok(Response {
            text,
            tokens_used: TokenUsage {
                input: query.text.len() as u64,
                output: 0,
            },
            provider: self.name.clone(),
            latency_ms: 0,
        })
    }
}

/// Deterministic embedding provider backed by fixed vectors.
///
/// A text gets the vector registered for it verbatim, else the vector of the
/// first registered pattern it contains, else the default vector. Texts
/// containing a failure trigger return [`Error::Provider`].
#[derive(Clone)]
pub struct StubEmbedder {
    /// Vectors keyed by text or substring, in registration order
    vectors: Vec<(String, Embedding)>,
    /// Vector for texts matching no pattern
    default_vector: Embedding,
    /// Substrings that make `embed` fail
    failure_triggers: Vec<String>,
    /// Every text passed to `embed`, in call order
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubEmbedder {
    /// Creates a stub whose unmatched texts embed to `default_vector`.
    #[must_use]
    pub fn new(default_vector: Embedding) -> Self {
        Self {
            vectors: Vec::new(),
            default_vector,
            failure_triggers: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers `vector` for texts equal to or containing `pattern`.
    #[must_use]
    pub fn with_vector(mut self, pattern: impl Into<String>, vector: Embedding) -> Self {
        self.vectors.push((pattern.into(), vector));
        self
    }

    /// Makes `embed` fail for texts containing `trigger`.
    #[must_use]
    pub fn failing_on(mut self, trigger: impl Into<String>) -> Self {
        self.failure_triggers.push(trigger.into());
        self
    }

    /// Texts received so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        let calls = self.calls.lock_ignore_poison();
        calls.clone()
    }

    /// Number of `embed` calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        let calls = self.calls.lock_ignore_poison();
        calls.len()
    }

    /// Vector for `text` without recording a call.
    fn lookup(&self, text: &str) -> Embedding {
        self.vectors
            .iter()
            .find(|(pattern, _)| pattern == text)
            .or_else(|| {
                self.vectors
                    .iter()
                    .find(|(pattern, _)| text.contains(pattern.as_str()))
            })
            .map_or_else(|| self.default_vector.clone(), |(_, vector)| vector.clone())
    }
}

impl EmbeddingProvider for StubEmbedder {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        {
            let mut calls = self.calls.lock_ignore_poison();
            calls.push(text.to_owned());
        }

        if let Some(trigger) = self
            .failure_triggers
            .iter()
            .find(|trigger| text.contains(trigger.as_str()))
        {
            return Err(Error::Provider(format!("stub failure triggered by '{trigger}'")));
        }

        Ok(self.lookup(text))
    }
}
