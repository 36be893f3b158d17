use async_trait::async_trait;
use kbase_core::{
    ANSWER_SYSTEM_PROMPT, AnswerProvider, Context, Embedding, EmbeddingProvider, Error,
    KbaseConfig, Query, Response, Result, TokenUsage, build_answer_prompt,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Public OpenAI endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
/// Default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
/// Default chat model.
const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
/// Default sampling temperature for answers.
const DEFAULT_TEMPERATURE: f32 = 0.3;
/// Default completion budget for answers.
const DEFAULT_MAX_TOKENS: usize = 800;
/// Env var named in missing-key errors.
const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Endpoint suffixes users sometimes paste as part of the base URL.
const ENDPOINT_SUFFIXES: [&str; 2] = ["/chat/completions", "/embeddings"];

/// Client for OpenAI-compatible `/embeddings` and `/chat/completions` endpoints.
///
/// One value serves both as the embedding provider and as the answer provider.
#[derive(Clone)]
pub struct OpenAiProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Bearer token.
    api_key: String,
    /// Normalised base URL without trailing slash.
    base_url: String,
    /// Model used for `/embeddings`.
    embedding_model: String,
    /// Model used for `/chat/completions`.
    chat_model: String,
    /// Sampling temperature for answers.
    temperature: f32,
    /// Completion budget for answers.
    max_tokens: usize,
}

impl OpenAiProvider {
    /// Creates a provider for the public OpenAI endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] if `api_key` is empty.
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey(ENV_OPENAI_API_KEY.to_owned()));
        }

        Ok(Self {
            client: Client::default(),
            api_key,
            base_url: DEFAULT_API_BASE.to_owned(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_owned(),
            chat_model: DEFAULT_CHAT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Creates a provider from the `api`, `embedding`, and `answer` config sections.
    ///
    /// The API key and base URL fall back to `OPENAI_API_KEY` and `OPENAI_API_BASE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] if no key is configured anywhere.
    pub fn from_config(config: &KbaseConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| Error::MissingApiKey(ENV_OPENAI_API_KEY.to_owned()))?;

        let mut provider = Self::new(api_key)?
            .with_embedding_model(config.embedding.model.clone())
            .with_chat_model(config.answer.model.clone())
            .with_sampling(config.answer.temperature, config.answer.max_tokens);

        if let Some(base) = config.api_base() {
            provider = provider.with_base_url(&base);
        }

        Ok(provider)
    }

    /// Points the provider at a compatible service or proxy.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Sets the embedding model.
    #[must_use]
    pub fn with_embedding_model(mut self, model: String) -> Self {
        self.embedding_model = model;
        self
    }

    /// Sets the chat model.
    #[must_use]
    pub fn with_chat_model(mut self, model: String) -> Self {
        self.chat_model = model;
        self
    }

    /// Sets temperature and completion budget.
    #[must_use]
    pub fn with_sampling(mut self, temperature: f32, max_tokens: usize) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Base URL in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Embedding model in use.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Chat model in use.
    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    /// POSTs `body` as JSON to `{base_url}{path}` and decodes the reply.
    async fn post_json<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Provider(format!(
                "OpenAI API error {status} on {path}: {error_text}"
            )));
        }

        response.json().await.map_err(|error| {
            Error::InvalidResponse(format!("Failed to parse {path} response: {error}"))
        })
    }
}

/// Strips whitespace, trailing slashes, and a pasted endpoint suffix from a base URL.
///
/// `https://proxy/v1/chat/completions/` and `https://proxy/v1` both become
/// `https://proxy/v1`.
pub fn normalize_base_url(raw: &str) -> String {
    let mut base = raw.trim().trim_end_matches('/');
    for suffix in ENDPOINT_SUFFIXES {
        if let Some(stripped) = base.strip_suffix(suffix) {
            base = stripped.trim_end_matches('/');
        }
    }
    base.to_owned()
}

/// Request body for `/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'request> {
    /// Embedding model identifier.
    model: &'request str,
    /// Text to embed.
    input: &'request str,
}

/// Response body from `/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    /// One entry per input.
    data: Vec<EmbeddingData>,
}

/// A single embedding entry.
#[derive(Debug, Deserialize)]
struct EmbeddingData {
    /// The vector.
    embedding: Embedding,
}

/// Request body for `/chat/completions`.
#[derive(Debug, Serialize)]
struct ChatRequest<'request> {
    /// Chat model identifier.
    model: &'request str,
    /// System and user messages.
    messages: Vec<ChatMessage>,
    /// Sampling temperature.
    temperature: f32,
    /// Completion budget.
    max_tokens: usize,
}

/// Message delivered to the chat API.
#[derive(Debug, Serialize)]
struct ChatMessage {
    /// Role of the message author (`system` or `user`).
    role: &'static str,
    /// Textual content of the message.
    content: String,
}

/// Response body from `/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Candidate completions.
    choices: Vec<ChatChoice>,
    /// Token accounting, absent on some compatible services.
    #[serde(default)]
    usage: Option<ChatUsage>,
}

/// A single completion choice.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    /// Generated message.
    message: ChatResponseMessage,
}

/// Generated message.
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    /// Generated text, `null` when the model refused.
    #[serde(default)]
    content: Option<String>,
}

/// Token usage metrics.
#[derive(Debug, Deserialize)]
struct ChatUsage {
    /// Prompt tokens.
    prompt_tokens: u64,
    /// Completion tokens.
    completion_tokens: u64,
}

impl EmbeddingProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn ensure_ready(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey(ENV_OPENAI_API_KEY.to_owned()));
        }
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: text,
        };

        let response: EmbeddingResponse = self.post_json("/embeddings", &request).await?;

        response
            .data
            .into_iter()
            .next()
            .map(|entry| entry.embedding)
            .ok_or_else(|| Error::InvalidResponse("No embeddings returned".to_owned()))
    }
}

#[async_trait]
impl AnswerProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn answer(&self, query: &Query, context: &Context) -> Result<Response> {
        let start = Instant::now();

        let system_content = if context.system_prompt.is_empty() {
            ANSWER_SYSTEM_PROMPT.to_owned()
        } else {
            context.system_prompt.clone()
        };

        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_content,
                },
                ChatMessage {
                    role: "user",
                    content: build_answer_prompt(&query.text, &context.chunks)?,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let chat_response: ChatResponse = self.post_json("/chat/completions", &request).await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::InvalidResponse("No answer returned".to_owned()))?;

        let tokens_used = chat_response
            .usage
            .map(|usage| TokenUsage {
                input: usage.prompt_tokens,
                output: usage.completion_tokens,
            })
            .unwrap_or_default();

        Ok(Response {
            text,
            tokens_used,
            provider: format!("OpenAI/{}", self.chat_model),
            latency_ms,
        })
    }
}
