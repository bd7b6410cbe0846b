//! triage - task priority scoring CLI
//!
//! Ranks a batch of tasks by urgency, importance, effort, and dependency
//! weight, and rejects batches whose dependencies form a cycle.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use triage::cli::Cli;
use triage::output::{emit_error, infer_command_name_from_args};

fn main() {
    let command = infer_command_name_from_args();
    let cli = Cli::parse();

    // Tracing is opt-in via RUST_LOG (or --verbose).
    // Keep startup robust in CI/robot envs: ignore invalid/huge filters.
    let default_filter = if cli.verbose { "triage=debug" } else { "off" };
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let json = cli.json;
    if let Err(err) = cli.run() {
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}
