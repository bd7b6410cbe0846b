//! Task records and normalization.
//!
//! Raw tasks arrive as loosely typed JSON. Every optional field is kept as a
//! `serde_json::Value` so that dirty input reaches [`normalize`] instead of
//! failing deserialization. Normalization never fails: malformed values fall
//! back to documented defaults and leave a note behind.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub const DEFAULT_IMPORTANCE: i64 = 5;
pub const DEFAULT_ESTIMATED_HOURS: f64 = 1.0;

pub const NOTE_PARSED_DUE_DATE: &str = "parsed due date string";
pub const NOTE_INVALID_DUE_DATE: &str = "invalid due date format; ignored";
pub const NOTE_INVALID_IMPORTANCE: &str = "invalid importance; defaulted to 5";
pub const NOTE_INVALID_HOURS: &str = "invalid estimated hours; defaulted to 1";
pub const NOTE_INVALID_DEPENDENCIES: &str = "invalid dependencies; ignored";
pub const NOTE_IGNORED_DEPENDENCY: &str = "ignored dependency entry that is not a title";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A task as supplied by the caller, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,
}

impl RawTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn due_date(mut self, value: impl Into<Value>) -> Self {
        self.due_date = Some(value.into());
        self
    }

    pub fn estimated_hours(mut self, value: impl Into<Value>) -> Self {
        self.estimated_hours = Some(value.into());
        self
    }

    pub fn importance(mut self, value: impl Into<Value>) -> Self {
        self.importance = Some(value.into());
        self
    }

    pub fn dependencies<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles = titles
            .into_iter()
            .map(|title| Value::String(title.into()))
            .collect();
        self.dependencies = Some(Value::Array(titles));
        self
    }
}

/// A task in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: f64,
    pub importance: i64,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_date: None,
            estimated_hours: DEFAULT_ESTIMATED_HOURS,
            importance: DEFAULT_IMPORTANCE,
            dependencies: Vec::new(),
        }
    }
}

/// A normalized task together with the corrections made to reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    #[serde(flatten)]
    pub task: Task,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Titles present in one batch; dependencies resolve against it.
#[derive(Debug, Clone, Default)]
pub struct TaskLookup<'a> {
    titles: HashSet<&'a str>,
}

impl<'a> TaskLookup<'a> {
    pub fn from_tasks(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let titles = tasks.into_iter().map(|task| task.title.as_str()).collect();
        Self { titles }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }
}

/// Normalize a raw task into a new canonical record.
///
/// Each field is handled independently. The input is never modified.
pub fn normalize(raw: &RawTask) -> Normalized {
    let mut notes = Vec::new();

    let due_date = normalize_due_date(raw.due_date.as_ref(), &mut notes);

    let importance = match present(raw.importance.as_ref()) {
        None => DEFAULT_IMPORTANCE,
        Some(value) => coerce_integer(value).unwrap_or_else(|| {
            notes.push(NOTE_INVALID_IMPORTANCE.to_string());
            DEFAULT_IMPORTANCE
        }),
    };

    let estimated_hours = match present(raw.estimated_hours.as_ref()) {
        None => DEFAULT_ESTIMATED_HOURS,
        Some(value) => coerce_real(value).unwrap_or_else(|| {
            notes.push(NOTE_INVALID_HOURS.to_string());
            DEFAULT_ESTIMATED_HOURS
        }),
    };

    let dependencies = normalize_dependencies(raw.dependencies.as_ref(), &mut notes);

    if !notes.is_empty() {
        tracing::debug!(title = %raw.title, ?notes, "normalized task with corrections");
    }

    Normalized {
        task: Task {
            title: raw.title.clone(),
            due_date,
            estimated_hours,
            importance,
            dependencies,
        },
        notes,
    }
}

/// Parse a JSON document holding an array of raw tasks.
///
/// Only structural problems are rejected here: a non-array document, an
/// entry that is not an object, or a missing/blank title.
pub fn parse_batch(input: &str) -> Result<Vec<RawTask>> {
    let document: Value = serde_json::from_str(input)
        .map_err(|err| Error::InvalidInput(format!("invalid JSON: {err}")))?;
    let Value::Array(entries) = document else {
        return Err(Error::InvalidInput("expected a JSON array of tasks".to_string()));
    };

    let mut tasks = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let raw: RawTask = serde_json::from_value(entry)
            .map_err(|err| Error::InvalidInput(format!("task #{index}: {err}")))?;
        if raw.title.trim().is_empty() {
            return Err(Error::InvalidInput(format!("task #{index}: title cannot be empty")));
        }
        tasks.push(raw);
    }

    Ok(tasks)
}

/// Parse an ISO-8601 date, or the date part of an ISO-8601 timestamp.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|stamp| stamp.date())
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn normalize_due_date(value: Option<&Value>, notes: &mut Vec<String>) -> Option<NaiveDate> {
    let value = present(value)?;
    let parsed = value.as_str().and_then(parse_iso_date);
    match parsed {
        Some(date) => {
            notes.push(NOTE_PARSED_DUE_DATE.to_string());
            Some(date)
        }
        None => {
            notes.push(NOTE_INVALID_DUE_DATE.to_string());
            None
        }
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float.trunc() as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        Value::Bool(flag) => Some(i64::from(*flag)),
        _ => None,
    }
}

fn coerce_real(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    };
    // Infinities saturate so the task still serializes as a JSON number.
    parsed
        .filter(|real| !real.is_nan())
        .map(|real| real.clamp(f64::MIN, f64::MAX))
}

fn normalize_dependencies(value: Option<&Value>, notes: &mut Vec<String>) -> Vec<String> {
    match present(value) {
        None => Vec::new(),
        Some(Value::Array(items)) => {
            let mut dependencies = Vec::with_capacity(items.len());
            let mut skipped = false;
            for item in items {
                match item {
                    Value::String(title) => dependencies.push(title.clone()),
                    Value::Number(number) => dependencies.push(number.to_string()),
                    _ => skipped = true,
                }
            }
            if skipped {
                notes.push(NOTE_IGNORED_DEPENDENCY.to_string());
            }
            dependencies
        }
        Some(_) => {
            notes.push(NOTE_INVALID_DEPENDENCIES.to_string());
            Vec::new()
        }
    }
}
