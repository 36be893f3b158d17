use clap::{Args, Parser, Subcommand, ValueEnum};
use kbase_core::ChunkStrategy;
use std::path::PathBuf;

/// Command-line arguments for kbase
#[derive(Parser, Debug)]
#[command(name = "kbase")]
#[command(version, about = "Ask questions about a document using retrieved passages", long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, help = "Config file [default: ~/.kbase/config.toml]")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Chunking overrides shared by several subcommands
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ChunkArgs {
    /// Overrides `chunking.chunk_size`
    #[arg(long, help = "Target chunk size in characters")]
    pub chunk_size: Option<usize>,

    /// Overrides `chunking.overlap`
    #[arg(long, help = "Characters repeated between consecutive chunks")]
    pub overlap: Option<usize>,

    /// Overrides `chunking.strategy`
    #[arg(long, value_enum, help = "How the document is split into chunks")]
    pub strategy: Option<StrategyArg>,
}

/// Chunking strategy names accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// Pack blank-line separated paragraphs
    Paragraph,
    /// Split on blank lines, newlines, spaces, then characters
    Recursive,
}

impl From<StrategyArg> for ChunkStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::Paragraph => Self::Paragraph,
            StrategyArg::Recursive => Self::Recursive,
        }
    }
}

/// Retrieval and output options for question answering
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct AskArgs {
    /// Overrides `retrieval.top_k`
    #[arg(short = 'k', long, help = "Number of chunks passed to the model")]
    pub top_k: Option<usize>,

    /// Print retrieved chunks after the answer
    #[arg(long, help = "Show the retrieved chunks with their scores")]
    pub sources: bool,

    /// Chunking overrides
    #[command(flatten)]
    pub chunking: ChunkArgs,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Split a document into chunks and print them (no network)")]
    Chunk {
        #[arg(help = "Document to split (.md, .markdown, or plain text)")]
        file: PathBuf,

        #[command(flatten)]
        chunking: ChunkArgs,

        #[arg(long, help = "Print chunks as a JSON array")]
        json: bool,
    },

    #[command(about = "Answer one question about a document")]
    Ask {
        #[arg(help = "Document to load")]
        file: PathBuf,

        #[arg(help = "Question to answer")]
        question: String,

        #[command(flatten)]
        options: AskArgs,

        #[arg(long, help = "Print the answer and its sources as JSON")]
        json: bool,
    },

    #[command(about = "Load a document once and answer questions from stdin until EOF or 'exit'")]
    Chat {
        #[arg(help = "Document to load")]
        file: PathBuf,

        #[command(flatten)]
        options: AskArgs,
    },

    #[command(about = "Show the effective configuration with the API key redacted")]
    Config {
        #[arg(long, help = "Print only the config file path")]
        path: bool,
    },
}
