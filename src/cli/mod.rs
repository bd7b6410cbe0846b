//! Command-line interface for triage
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::error::{Error, Result};
use crate::scoring::{Strategy, WeightOverride};
use crate::task::{self, RawTask};

mod analyze;
mod check;
mod strategies;
mod suggest;

/// triage - task priority scoring
///
/// Scores a batch of tasks by urgency, importance, effort, and how many
/// other tasks they unblock, and rejects batches whose dependencies loop.
#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Working directory holding .triage.toml and .triage/ (defaults to current directory)
    #[arg(long, global = true, env = "TRIAGE_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score and rank a batch of tasks
    Analyze {
        /// JSON file with an array of tasks ("-" or omitted reads stdin)
        input: Option<PathBuf>,

        /// Weighting strategy: smart, fastest, impact, deadline
        #[arg(short, long)]
        strategy: Option<String>,

        /// Weight override as a JSON object, e.g. '{"u": 3, "e": 0.5}'
        #[arg(short, long)]
        weights: Option<String>,

        /// Do not save the batch for `triage suggest`
        #[arg(long)]
        no_save: bool,
    },

    /// Re-score the last analyzed batch and show the top picks
    Suggest {
        /// Weighting strategy: smart, fastest, impact, deadline
        #[arg(short, long)]
        strategy: Option<String>,

        /// Weight override as a JSON object
        #[arg(short, long)]
        weights: Option<String>,

        /// Number of tasks to suggest
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Check a batch for circular dependencies
    Check {
        /// JSON file with an array of tasks ("-" or omitted reads stdin)
        input: Option<PathBuf>,
    },

    /// List the available weighting strategies
    Strategies,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Analyze {
                input,
                strategy,
                weights,
                no_save,
            } => analyze::run(analyze::AnalyzeOptions {
                input,
                strategy,
                weights,
                no_save,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Suggest {
                strategy,
                weights,
                limit,
            } => suggest::run(suggest::SuggestOptions {
                strategy,
                weights,
                limit,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Check { input } => check::run(check::CheckOptions {
                input,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Strategies => strategies::run(strategies::StrategiesOptions {
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}

fn resolve_dir(dir: Option<PathBuf>) -> PathBuf {
    dir.or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Read a task batch from `input`, or stdin when it is absent or `-`.
fn read_batch(input: Option<&Path>) -> Result<Vec<RawTask>> {
    let content = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Error::InvalidArgument(format!("input file not found: {}", path.display()))
            } else {
                Error::Io(err)
            }
        })?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    task::parse_batch(&content)
}

fn parse_weights(raw: Option<&str>) -> Result<Option<WeightOverride>> {
    raw.map(WeightOverride::parse).transpose()
}

/// Warning for a `--strategy` value that will fall back to smart.
fn strategy_warning(requested: Option<&str>) -> Option<String> {
    let requested = requested?;
    if Strategy::from_name(requested).is_some() {
        return None;
    }
    Some(format!(
        "unknown strategy '{requested}'; using {}",
        Strategy::default()
    ))
}
