//! triage suggest command implementation

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{self, ScoredTask};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::scoring::{Strategy, Weights};
use crate::session::SessionStore;

use super::analyze::{format_scored, format_weights};

/// Options for `triage suggest`
pub struct SuggestOptions {
    pub strategy: Option<String>,
    pub weights: Option<String>,
    pub limit: Option<usize>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct SuggestReport {
    analysis_id: String,
    analyzed_at: DateTime<Utc>,
    strategy: Strategy,
    weights: Weights,
    cycles: bool,
    suggestions: Vec<ScoredTask>,
}

pub fn run(options: SuggestOptions) -> Result<()> {
    let dir = super::resolve_dir(options.dir);
    let (config, config_warning) = Config::load_or_default(&dir);

    let limit = options.limit.unwrap_or(config.suggest.limit);
    if limit == 0 {
        return Err(Error::InvalidArgument("--limit must be > 0".to_string()));
    }
    let overrides = super::parse_weights(options.weights.as_deref())?;
    let scoring = config
        .scoring
        .options(options.strategy.as_deref(), overrides);

    let store = SessionStore::new(&dir).with_lock_timeout(config.session.lock_timeout_ms);
    let session = store.require()?;

    let picks = analysis::suggest(&session.tasks, &scoring, super::today(), limit);
    let report = SuggestReport {
        analysis_id: session.analysis_id,
        analyzed_at: session.analyzed_at,
        strategy: picks.strategy,
        weights: scoring.weights(),
        cycles: picks.cycles,
        suggestions: picks.suggestions,
    };

    let mut human = HumanOutput::new(format!(
        "triage suggest: top {} of {} with {}",
        report.suggestions.len(),
        session.tasks.len(),
        report.strategy
    ));
    human.push_summary("strategy", report.strategy.to_string());
    human.push_summary("weights", format_weights(&report.weights));
    human.push_summary("analyzed_at", report.analyzed_at.to_rfc3339());
    for (rank, scored) in report.suggestions.iter().enumerate() {
        human.push_detail(format_scored(rank + 1, scored));
    }
    if let Some(warning) = config_warning {
        human.push_warning(warning);
    }
    if let Some(warning) = super::strategy_warning(options.strategy.as_deref()) {
        human.push_warning(warning);
    }
    if report.cycles {
        human.push_warning("saved batch contains circular dependencies");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "suggest",
        &report,
        Some(&human),
    )?;

    Ok(())
}
