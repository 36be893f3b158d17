//! Command handlers for CLI operations

use anyhow::{Context as _, Result};
use kbase_context::{Answer, ChunkConfig, DocumentIndex, QaPipeline, load_document, split_document};
use kbase_core::{EmbeddingProvider as _, KbaseConfig};
use kbase_providers::{EmbeddingBackend, OpenAiProvider};
use serde_json::to_string_pretty;
use std::io::{self, Write as _};
use std::path::Path;
use tokio::io::{AsyncBufReadExt as _, BufReader, stdin};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::cli::{AskArgs, ChunkArgs};

/// Pipeline wired to the configured services.
type LivePipeline = QaPipeline<EmbeddingBackend, OpenAiProvider>;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "kbase_context=info,kbase_providers=info,kbase_cli=info";
/// Log filter used with `--verbose`.
const VERBOSE_FILTER: &str = "kbase_context=debug,kbase_providers=debug,kbase_cli=debug";
/// Chat lines that end the session.
const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

/// Install the tracing subscriber. Logs go to stderr so stdout stays clean.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };

    Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .init();
}

/// Load the config file, creating it with defaults on first use.
///
/// # Errors
/// Returns an error if the file cannot be read, written, or validated.
pub fn load_config(path: &Path) -> Result<KbaseConfig> {
    KbaseConfig::load_or_create(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Apply command-line overrides on top of the file config and re-validate.
fn apply_overrides(
    mut config: KbaseConfig,
    chunking: ChunkArgs,
    top_k: Option<usize>,
) -> Result<KbaseConfig> {
    if let Some(chunk_size) = chunking.chunk_size {
        config.chunking.chunk_size = chunk_size;
    }
    if let Some(overlap) = chunking.overlap {
        config.chunking.overlap = overlap;
    }
    if let Some(strategy) = chunking.strategy {
        config.chunking.strategy = strategy.into();
    }
    if let Some(top_k) = top_k {
        config.retrieval.top_k = top_k;
    }
    config.validate()?;
    Ok(config)
}

/// Handle `kbase chunk`
///
/// # Errors
/// Returns an error if the document cannot be loaded or the settings are invalid.
pub fn handle_chunk(config: KbaseConfig, file: &Path, chunking: ChunkArgs, json: bool) -> Result<()> {
    let config = apply_overrides(config, chunking, None)?;
    let chunk_config = ChunkConfig::from_settings(&config.chunking)?;

    let text = load_document(file)?;
    let chunks = split_document(&text, &chunk_config);
    tracing::debug!(
        "Split {} into {} chunks (size {}, overlap {}, {:?})",
        file.display(),
        chunks.len(),
        chunk_config.chunk_size(),
        chunk_config.overlap(),
        chunk_config.strategy()
    );

    let mut stdout = io::stdout().lock();
    if json {
        writeln!(stdout, "{}", to_string_pretty(&chunks)?)?;
    } else {
        for (index, chunk) in chunks.iter().enumerate() {
            writeln!(
                stdout,
                "--- chunk {index} ({} chars) ---\n{chunk}\n",
                chunk.chars().count()
            )?;
        }
    }
    Ok(())
}

/// Handle `kbase ask`
///
/// # Errors
/// Returns an error if providers cannot be configured, the document cannot be
/// loaded, or the question cannot be answered.
pub async fn handle_ask(
    config: KbaseConfig,
    file: &Path,
    question: &str,
    options: AskArgs,
    json: bool,
) -> Result<()> {
    let config = apply_overrides(config, options.chunking, options.top_k)?;
    let pipeline = build_pipeline(&config).await?;
    let index = ingest_file(&pipeline, file).await?;

    let answer = pipeline.ask(&index, question).await?;
    if json {
        writeln!(io::stdout().lock(), "{}", to_string_pretty(&answer)?)?;
        Ok(())
    } else {
        print_answer(&answer, options.sources)
    }
}

/// Handle `kbase chat`
///
/// # Errors
/// Returns an error if providers cannot be configured, the document cannot be
/// loaded, or stdin/stdout fail. Per-question failures are reported and the
/// session continues.
pub async fn handle_chat(config: KbaseConfig, file: &Path, options: AskArgs) -> Result<()> {
    let config = apply_overrides(config, options.chunking, options.top_k)?;
    let pipeline = build_pipeline(&config).await?;
    let index = ingest_file(&pipeline, file).await?;

    {
        let mut stdout = io::stdout().lock();
        writeln!(
            stdout,
            "Loaded {} ({} chunks). Ask a question, or type 'exit' to quit.",
            file.display(),
            index.len()
        )?;
    }

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&question) {
            break;
        }

        match pipeline.ask(&index, question).await {
            Ok(answer) => print_answer(&answer, options.sources)?,
            Err(error) => {
                tracing::error!("Question failed: {error}");
                writeln!(io::stdout().lock(), "Error: {error}")?;
            }
        }
    }
    Ok(())
}

/// Handle `kbase config`
///
/// # Errors
/// Returns an error if the config cannot be serialized or stdout fails.
pub fn handle_config(config: &KbaseConfig, config_path: &Path, path_only: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if path_only {
        writeln!(stdout, "{}", config_path.display())?;
    } else {
        writeln!(stdout, "# {}", config_path.display())?;
        write!(stdout, "{}", toml::to_string_pretty(&config.redacted())?)?;
    }
    Ok(())
}

/// Build the embedding backend and answer provider named by `config`.
async fn build_pipeline(config: &KbaseConfig) -> Result<LivePipeline> {
    let answerer = OpenAiProvider::from_config(config)
        .context("An API key is required: set api.api_key in the config file or OPENAI_API_KEY")?;
    let embedder = EmbeddingBackend::from_config(config)?;
    embedder.ensure_ready().await?;

    tracing::debug!(
        "Using {} embeddings ({}) and chat model '{}' at {}",
        embedder.name(),
        embedder.model(),
        answerer.chat_model(),
        answerer.base_url()
    );

    Ok(QaPipeline::from_config(embedder, answerer, config)?)
}

/// Load and index a document.
async fn ingest_file(pipeline: &LivePipeline, file: &Path) -> Result<DocumentIndex> {
    let text = load_document(file)?;
    Ok(pipeline.ingest(&text).await?)
}

/// Write an answer and, optionally, its sources.
fn print_answer(answer: &Answer, show_sources: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", answer.response.text)?;

    if show_sources {
        writeln!(stdout, "\nSources:")?;
        for (rank, hit) in answer.sources.iter().enumerate() {
            writeln!(
                stdout,
                "[{}] chunk {} (score {:.3})\n{}\n",
                rank + 1,
                hit.index,
                hit.score,
                hit.text
            )?;
        }
    }
    Ok(())
}

/// Show the chat prompt.
fn prompt() -> Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}
