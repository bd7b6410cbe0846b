//! triage analyze command implementation

use std::path::PathBuf;

use serde::Serialize;

use crate::analysis::{self, Analysis, ScoredTask};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::scoring::{Strategy, Weights};
use crate::session::{Session, SessionStore};

/// Options for `triage analyze`
pub struct AnalyzeOptions {
    pub input: Option<PathBuf>,
    pub strategy: Option<String>,
    pub weights: Option<String>,
    pub no_save: bool,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct AnalyzeReport {
    strategy: Strategy,
    weights: Weights,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_path: Option<PathBuf>,
    tasks: Vec<ScoredTask>,
}

pub fn run(options: AnalyzeOptions) -> Result<()> {
    let dir = super::resolve_dir(options.dir);
    let (config, config_warning) = Config::load_or_default(&dir);

    let raw = super::read_batch(options.input.as_deref())?;
    let overrides = super::parse_weights(options.weights.as_deref())?;
    let scoring = config
        .scoring
        .options(options.strategy.as_deref(), overrides);

    let normalized = analysis::normalize_batch(&raw);
    let ranked = match analysis::analyze_normalized(&normalized, &scoring, super::today()) {
        Analysis::Ranked(tasks) => tasks,
        Analysis::CycleDetected { cycle } => return Err(Error::CircularDependency { cycle }),
    };

    let mut analysis_id = None;
    let mut session_path = None;
    if !options.no_save && config.session.enabled {
        let store = SessionStore::new(&dir).with_lock_timeout(config.session.lock_timeout_ms);
        let session = Session::new(scoring.strategy, normalized);
        store.save(&session)?;
        analysis_id = Some(session.analysis_id);
        session_path = Some(store.path());
    }

    let report = AnalyzeReport {
        strategy: scoring.strategy,
        weights: scoring.weights(),
        count: ranked.len(),
        analysis_id,
        session_path,
        tasks: ranked,
    };

    let mut human = HumanOutput::new(format!(
        "triage analyze: {} task(s) ranked with {}",
        report.count, report.strategy
    ));
    human.push_summary("strategy", report.strategy.to_string());
    human.push_summary("weights", format_weights(&report.weights));
    if let Some(path) = &report.session_path {
        human.push_summary("saved", path.display().to_string());
    }
    for (rank, scored) in report.tasks.iter().enumerate() {
        human.push_detail(format_scored(rank + 1, scored));
    }
    if let Some(warning) = config_warning {
        human.push_warning(warning);
    }
    if let Some(warning) = super::strategy_warning(options.strategy.as_deref()) {
        human.push_warning(warning);
    }
    if report.session_path.is_some() {
        human.push_next_step("triage suggest");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "analyze",
        &report,
        Some(&human),
    )?;

    Ok(())
}

pub(super) fn format_weights(weights: &Weights) -> String {
    format!(
        "u={} i={} e={} d={}",
        weights.u, weights.i, weights.e, weights.d
    )
}

pub(super) fn format_scored(rank: usize, scored: &ScoredTask) -> String {
    let mut line = format!(
        "{rank}. [{} {}] {} ({})",
        scored.score, scored.priority, scored.task.title, scored.breakdown.explanation
    );
    if !scored.breakdown.notes.is_empty() {
        line.push_str(&format!("; {}", scored.breakdown.notes.join("; ")));
    }
    line
}
