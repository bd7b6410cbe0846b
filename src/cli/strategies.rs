//! triage strategies command implementation

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::scoring::{Strategy, Weights};

use super::analyze::format_weights;

/// Options for `triage strategies`
pub struct StrategiesOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct StrategyEntry {
    name: Strategy,
    description: &'static str,
    weights: Weights,
}

#[derive(Serialize)]
struct StrategiesReport {
    default: Strategy,
    strategies: Vec<StrategyEntry>,
}

pub fn run(options: StrategiesOptions) -> Result<()> {
    let dir = super::resolve_dir(options.dir);
    let (config, config_warning) = Config::load_or_default(&dir);
    let default = Strategy::resolve(&config.scoring.strategy);

    let report = StrategiesReport {
        default,
        strategies: Strategy::ALL
            .into_iter()
            .map(|strategy| StrategyEntry {
                name: strategy,
                description: strategy.description(),
                weights: strategy.weights(),
            })
            .collect(),
    };

    let mut human = HumanOutput::new("triage strategies");
    human.push_summary("default", default.to_string());
    if let Some(warning) = config_warning {
        human.push_warning(warning);
    }
    for entry in &report.strategies {
        human.push_detail(format!(
            "{}: {} ({})",
            entry.name,
            entry.description,
            format_weights(&entry.weights)
        ));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "strategies",
        &report,
        Some(&human),
    )?;

    Ok(())
}
