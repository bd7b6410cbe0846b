//! triage check command implementation
//!
//! Runs only the cycle detector. A cyclic batch fails with exit code 3.

use std::path::PathBuf;

use serde::Serialize;

use crate::analysis;
use crate::error::{Error, Result};
use crate::graph::DependencyGraph;
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for `triage check`
pub struct CheckOptions {
    pub input: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct CheckReport {
    tasks: usize,
    dependencies: usize,
    cycles: bool,
}

pub fn run(options: CheckOptions) -> Result<()> {
    let raw = super::read_batch(options.input.as_deref())?;
    let normalized = analysis::normalize_batch(&raw);
    let graph = DependencyGraph::from_tasks(normalized.iter().map(|n| &n.task));

    if let Some(cycle) = graph.find_cycle() {
        return Err(Error::CircularDependency { cycle });
    }

    let report = CheckReport {
        tasks: normalized.len(),
        dependencies: normalized.iter().map(|n| n.task.dependencies.len()).sum(),
        cycles: false,
    };

    let mut human = HumanOutput::new("triage check: no circular dependencies");
    human.push_summary("tasks", report.tasks.to_string());
    human.push_summary("dependencies", report.dependencies.to_string());
    human.push_next_step("triage analyze <file>");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "check",
        &report,
        Some(&human),
    )?;

    Ok(())
}
