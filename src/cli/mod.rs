//! Command-line parsing.
//!
//! The CLI is a thin stand-in for the web layer: it exercises exactly the
//! contracts a request handler would (train, status, single predict, batch),
//! and keeps argument parsing separate from the model code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Domain;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ecoml",
    version,
    about = "Sustainability analytics: train models, predict, and batch-process CSVs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train one domain, or all of them.
    Train(TrainArgs),
    /// Show per-domain training status.
    Status,
    /// Predict for a single JSON record.
    Predict(PredictArgs),
    /// Run batch predictions over a CSV file.
    Batch(BatchArgs),
    /// Print an example CSV for a domain's batch format.
    SampleCsv(SampleCsvArgs),
}

#[derive(Debug, Parser)]
pub struct TrainArgs {
    /// Domain to train; omit to train all four.
    #[arg(long, value_enum)]
    pub domain: Option<Domain>,
}

#[derive(Debug, Parser)]
pub struct PredictArgs {
    #[arg(long, value_enum)]
    pub domain: Domain,

    /// Inline JSON object with the input record.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,

    /// Path to a JSON file with the input record.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Fail on unknown categories instead of substituting fallbacks.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Parser)]
pub struct BatchArgs {
    #[arg(long, value_enum)]
    pub domain: Domain,

    /// Input CSV (first row is the header).
    #[arg(long)]
    pub csv: PathBuf,

    /// Write per-row results as JSON here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Fail rows on unknown categories instead of substituting fallbacks.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Parser)]
pub struct SampleCsvArgs {
    #[arg(long, value_enum)]
    pub domain: Domain,
}
