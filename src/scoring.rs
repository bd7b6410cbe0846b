//! Priority scoring.
//!
//! A task gets four raw sub-scores:
//!
//! - **urgency**: time pressure from the due date (30 past due, 25 due
//!   today, then `20 - days_left` floored at 0)
//! - **importance**: the importance rating doubled
//! - **effort**: quick-win bonus `10 - estimated_hours`, floored at 0
//! - **dependency impact**: 3 per dependency that names a known task
//!
//! A [`Strategy`] supplies the weights `(u, i, e, d)` that combine them. The
//! weighted sum is truncated and clamped to `0..=100`, then labelled with
//! fixed, strategy-independent thresholds.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::task::{Normalized, TaskLookup};

pub const MAX_SCORE: u8 = 100;
pub const HIGH_THRESHOLD: u8 = 45;
pub const MEDIUM_THRESHOLD: u8 = 25;

const PAST_DUE_URGENCY: i64 = 30;
const DUE_TODAY_URGENCY: i64 = 25;
const URGENCY_HORIZON_DAYS: i64 = 20;
const IMPORTANCE_FACTOR: i64 = 2;
const QUICK_WIN_HOURS: f64 = 10.0;
const POINTS_PER_DEPENDENCY: i64 = 3;

/// Named weight profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Smart,
    Fastest,
    Impact,
    Deadline,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Smart,
        Strategy::Fastest,
        Strategy::Impact,
        Strategy::Deadline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Smart => "smart",
            Strategy::Fastest => "fastest",
            Strategy::Impact => "impact",
            Strategy::Deadline => "deadline",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Smart => "balance urgency, importance, effort, and dependencies",
            Strategy::Fastest => "favor low-effort quick wins",
            Strategy::Impact => "favor important work",
            Strategy::Deadline => "favor tasks that are due soon",
        }
    }

    pub fn weights(&self) -> Weights {
        match self {
            Strategy::Smart => Weights::new(2.0, 3.0, 2.0, 2.0),
            Strategy::Fastest => Weights::new(1.0, 1.0, 3.0, 1.0),
            Strategy::Impact => Weights::new(1.0, 4.0, 1.0, 2.0),
            Strategy::Deadline => Weights::new(4.0, 1.0, 1.0, 2.0),
        }
    }

    /// Look up a strategy by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(name))
    }

    /// Like [`Strategy::from_name`], but unknown names fall back to `smart`.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(strategy = name, "unknown strategy; falling back to smart");
            Strategy::Smart
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Strategy::from_name(s).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "invalid strategy '{s}': must be smart, fastest, impact, or deadline"
            ))
        })
    }
}

/// Multipliers for the urgency, importance, effort, and dependency sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub u: f64,
    pub i: f64,
    pub e: f64,
    pub d: f64,
}

impl Weights {
    pub const fn new(u: f64, i: f64, e: f64, d: f64) -> Self {
        Self { u, i, e, d }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Strategy::default().weights()
    }
}

/// Partial replacement for a strategy's weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<f64>,
}

impl WeightOverride {
    /// Take numeric `u`/`i`/`e`/`d` entries from a JSON object.
    ///
    /// Unknown keys, non-numeric values, and non-object input are ignored.
    pub fn from_value(value: &Value) -> Self {
        let Some(entries) = value.as_object() else {
            return Self::default();
        };
        let pick = |key: &str| entries.get(key).and_then(Value::as_f64);
        Self {
            u: pick("u"),
            i: pick("i"),
            e: pick("e"),
            d: pick("d"),
        }
    }

    /// Parse a JSON object such as `{"u": 3, "e": 0.5}`.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| Error::InvalidArgument(format!("invalid weights JSON: {err}")))?;
        if !value.is_object() {
            return Err(Error::InvalidArgument("weights must be a JSON object".to_string()));
        }
        Ok(Self::from_value(&value))
    }

    pub fn is_empty(&self) -> bool {
        self.u.is_none() && self.i.is_none() && self.e.is_none() && self.d.is_none()
    }

    /// Layer `other` on top of `self`; entries set in `other` win.
    pub fn merge(self, other: WeightOverride) -> Self {
        Self {
            u: other.u.or(self.u),
            i: other.i.or(self.i),
            e: other.e.or(self.e),
            d: other.d.or(self.d),
        }
    }

    pub fn apply(&self, base: Weights) -> Weights {
        Weights {
            u: self.u.unwrap_or(base.u),
            i: self.i.unwrap_or(base.i),
            e: self.e.unwrap_or(base.e),
            d: self.d.unwrap_or(base.d),
        }
    }
}

/// Strategy plus optional override for one scoring run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoringOptions {
    pub strategy: Strategy,
    pub overrides: WeightOverride,
}

impl ScoringOptions {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            overrides: WeightOverride::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: WeightOverride) -> Self {
        self.overrides = overrides;
        self
    }

    /// The strategy's profile with the override applied.
    pub fn weights(&self) -> Weights {
        self.overrides.apply(self.strategy.weights())
    }
}

/// Priority label derived from a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Lower bounds are inclusive: 45 is High, 25 is Medium.
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_THRESHOLD {
            Priority::High
        } else if score >= MEDIUM_THRESHOLD {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a score was composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub urgency_raw: i64,
    pub importance_raw: i64,
    pub effort_raw: f64,
    pub dependency_raw: i64,
    pub weights: Weights,
    pub notes: Vec<String>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub score: u8,
    pub priority: Priority,
    pub breakdown: Breakdown,
}

/// Whole days from `today` until `due` (negative when overdue).
pub fn days_left(due: NaiveDate, today: NaiveDate) -> i64 {
    due.signed_duration_since(today).num_days()
}

pub fn urgency_raw(due_date: Option<NaiveDate>, today: NaiveDate) -> i64 {
    let Some(due) = due_date else {
        return 0;
    };
    match days_left(due, today) {
        days if days < 0 => PAST_DUE_URGENCY,
        0 => DUE_TODAY_URGENCY,
        days => (URGENCY_HORIZON_DAYS - days).max(0),
    }
}

pub fn importance_raw(importance: i64) -> i64 {
    importance.saturating_mul(IMPORTANCE_FACTOR)
}

pub fn effort_raw(estimated_hours: f64) -> f64 {
    (QUICK_WIN_HOURS - estimated_hours).max(0.0)
}

/// Dependency entries that resolve in the lookup; dangling titles add nothing.
pub fn dependency_raw(dependencies: &[String], lookup: &TaskLookup<'_>) -> i64 {
    let resolved = dependencies
        .iter()
        .filter(|title| lookup.contains(title))
        .count() as i64;
    resolved.saturating_mul(POINTS_PER_DEPENDENCY)
}

/// Truncate toward zero, then clamp into `0..=100`.
pub fn clamp_score(weighted: f64) -> u8 {
    // NaN saturates to 0 in the cast.
    weighted.trunc().clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// Score one normalized task against the batch lookup.
pub fn score_task(
    normalized: &Normalized,
    lookup: &TaskLookup<'_>,
    options: &ScoringOptions,
    today: NaiveDate,
) -> Score {
    let task = &normalized.task;
    let weights = options.weights();

    let urgency = urgency_raw(task.due_date, today);
    let importance = importance_raw(task.importance);
    let effort = effort_raw(task.estimated_hours);
    let dependency = dependency_raw(&task.dependencies, lookup);

    let weighted = urgency as f64 * weights.u
        + importance as f64 * weights.i
        + effort * weights.e
        + dependency as f64 * weights.d;
    let score = clamp_score(weighted);

    let mut notes = normalized.notes.clone();
    if let Some(note) = task.due_date.map(|due| urgency_note(due, today)) {
        notes.push(note);
    }

    tracing::debug!(
        title = %task.title,
        strategy = %options.strategy,
        urgency,
        importance,
        effort,
        dependency,
        weighted,
        score,
        "scored task"
    );

    Score {
        score,
        priority: Priority::from_score(score),
        breakdown: Breakdown {
            urgency_raw: urgency,
            importance_raw: importance,
            effort_raw: effort,
            dependency_raw: dependency,
            weights,
            notes,
            explanation: explanation(urgency, importance, effort, dependency),
        },
    }
}

fn urgency_note(due: NaiveDate, today: NaiveDate) -> String {
    match days_left(due, today) {
        days if days < 0 => "past due".to_string(),
        0 => "due today".to_string(),
        1 => "due in 1 day".to_string(),
        days => format!("due in {days} days"),
    }
}

fn explanation(urgency: i64, importance: i64, effort: f64, dependency: i64) -> String {
    let mut parts = Vec::with_capacity(4);
    if urgency != 0 {
        parts.push(format!("urgency={urgency}"));
    }
    parts.push(format!("importance={importance}"));
    parts.push(format!("effort={effort}"));
    if dependency != 0 {
        parts.push(format!("dependencies={dependency}"));
    }
    parts.join(", ")
}
