//! Command argument structures
//!
//! This module contains all CLI argument structs organized by command category.

use clap::Args;
use std::path::PathBuf;

// Discovery command arguments
#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Corpus file, one JSON object per line with `id`, `subject` and `body`
    pub corpus: PathBuf,

    /// Checkpoint file (overrides the configured path)
    #[arg(long, short)]
    pub checkpoint: Option<PathBuf>,

    /// Minimum occurrences for a value to be reported
    #[arg(long)]
    pub min_frequency: Option<u64>,

    /// Rows per batch
    #[arg(long, short)]
    pub batch_size: Option<usize>,

    /// Stop after this many batches; a later run resumes from the checkpoint
    #[arg(long)]
    pub max_batches: Option<u64>,

    /// Discard any existing checkpoint and start from the first row
    #[arg(long)]
    pub fresh: bool,

    /// Number of frequent values shown per pattern type
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Checkpoint file to summarise (overrides the configured path)
    #[arg(long, short)]
    pub checkpoint: Option<PathBuf>,

    /// Minimum occurrences for a value to be reported
    #[arg(long)]
    pub min_frequency: Option<u64>,

    /// Number of frequent values shown per pattern type
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}

// Extraction command arguments
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Text to extract from; reads stdin when neither text nor --file is given
    pub text: Option<String>,

    /// Read the message from a file
    #[arg(long, short, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Discovery checkpoint used to score structural matches
    #[arg(long, short)]
    pub checkpoint: Option<PathBuf>,

    /// Show every candidate, not only high-confidence ones
    #[arg(long, short)]
    pub all: bool,

    /// Only report verified rule matches
    #[arg(long)]
    pub rules_only: bool,
}

// Rule command arguments
#[derive(Args, Debug)]
pub struct ListRulesArgs {
    /// Only list rules for this category
    #[arg(long, short)]
    pub category: Option<String>,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Rules shown per category
    #[arg(long, short, default_value_t = 5)]
    pub top: usize,
}

#[derive(Args, Debug)]
pub struct ExportRulesArgs {
    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

// Inspection command arguments
#[derive(Args, Debug)]
pub struct StructureArgs {
    /// Tokens to convert to structural signatures
    #[arg(required = true)]
    pub tokens: Vec<String>,
}

#[derive(Args, Debug)]
pub struct NoiseArgs {
    /// Tokens to classify
    #[arg(required = true)]
    pub tokens: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[clap(name = "powershell")]
    Power,
    Elvish,
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::Power => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
