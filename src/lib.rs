//! triage - Task Priority Scoring Library
//!
//! Scores a batch of tasks and ranks them, after checking that their
//! dependencies do not form a cycle.
//!
//! # Core Concepts
//!
//! - **Normalization**: raw task records are coerced into typed tasks, with
//!   a note for every defaulted or dropped field
//! - **Strategies**: named weight profiles (`smart`, `fastest`, `impact`,
//!   `deadline`) with optional per-factor overrides
//! - **Cycle detection**: a batch whose dependencies loop is rejected
//! - **Session**: the last analyzed batch, saved for `triage suggest`
//!
//! # Module Organization
//!
//! - `task`: Raw and normalized task records
//! - `graph`: Dependency graph and cycle detection
//! - `scoring`: Strategies, weights, and the per-task scorer
//! - `analysis`: Batch pipeline (normalize, validate, score, rank, suggest)
//! - `session`: Saved last-analysis store
//! - `lock`: File locking and atomic writes for the session store
//! - `config`: Configuration loading from `.triage.toml`
//! - `output`: Human and JSON output
//! - `cli`: Command-line interface using clap
//! - `error`: Error types and result aliases
//!
//! ```
//! use chrono::NaiveDate;
//! use triage::analysis::{analyze, Analysis};
//! use triage::scoring::ScoringOptions;
//! use triage::task::RawTask;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
//! let batch = vec![
//!     RawTask::new("ship").due_date("2025-06-15").estimated_hours(1).importance(8),
//!     RawTask::new("docs").importance(3).dependencies(["ship"]),
//! ];
//!
//! match analyze(&batch, &ScoringOptions::default(), today) {
//!     Analysis::Ranked(tasks) => assert_eq!(tasks[0].task.title, "ship"),
//!     Analysis::CycleDetected { .. } => unreachable!(),
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod lock;
pub mod output;
pub mod scoring;
pub mod session;
pub mod task;

pub use error::{Error, Result};
