//! Command enum definitions
//!
//! This module contains the top-level parser and all CLI command enums.

use crate::args::*;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mailmine")]
#[command(about = "Discover and extract business identifiers from email", long_about = None)]
#[command(version = mailmine::VERSION)]
pub struct Cli {
    /// Configuration file (toml, yaml or json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json) - use json for tool integration
    #[arg(long, short, default_value = "table", global = true)]
    pub output: String,

    /// Verbose output (debug level logging)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress all logging output)
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display version information
    Version,

    /// Scan a corpus for recurring identifier patterns
    #[command(
        long_about = r#"
Scan a JSON Lines corpus for recurring identifier shapes. Every row is
matched against the generic templates, the counts are accumulated and the
record is checkpointed after each batch, so an interrupted run (Ctrl-C)
resumes where it stopped.

EXAMPLES:
  # Full scan with a checkpoint
  mailmine discover emails.jsonl --checkpoint discovery.json

  # Scan 20 batches now, continue later
  mailmine discover emails.jsonl -c discovery.json --max-batches 20
"#
    )]
    Discover(DiscoverArgs),

    /// Summarise a saved discovery checkpoint
    Report(ReportArgs),

    /// Extract identifiers from a single message
    #[command(
        long_about = r#"
Extract identifier candidates from one message using the verified rules
and the generic templates. Pass a discovery checkpoint to score structural
matches by how often their shape occurred in the corpus.

EXAMPLES:
  mailmine extract "Ticket TS-1818562 opened"
  mailmine extract --file message.txt --all
  cat message.txt | mailmine extract -o json
"#
    )]
    Extract(ExtractArgs),

    /// Verified rule library commands
    #[command(subcommand)]
    Rules(RulesCommands),

    /// Show the structural signature of tokens
    Structure(StructureArgs),

    /// Check whether tokens are classified as noise
    Noise(NoiseArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Subcommand, Debug)]
pub enum RulesCommands {
    /// List loaded rules, highest confidence first per category
    List(ListRulesArgs),

    /// Print the prompt summary of known identifier formats
    Prompt(PromptArgs),

    /// Export the loaded rules as JSON
    Export(ExportRulesArgs),
}
