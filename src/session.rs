//! Storage for the last analyzed batch.
//!
//! `triage analyze` saves its normalized batch here so that a later
//! `triage suggest` can re-score it with a different strategy. The store is
//! an explicit value owned by the caller; nothing in the scoring core reads
//! or writes it.
//!
//! ```text
//! <dir>/.triage/
//!   last_analysis.json        # Session (schema triage.session.v1)
//!   last_analysis.json.lock   # fs2 lock guarding reads and writes
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};
use crate::scoring::Strategy;
use crate::task::Normalized;

pub const SESSION_DIR: &str = ".triage";
pub const SESSION_FILE: &str = "last_analysis.json";
pub const SESSION_SCHEMA_VERSION: &str = "triage.session.v1";

fn default_schema_version() -> String {
    SESSION_SCHEMA_VERSION.to_string()
}

/// A saved batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub analysis_id: String,
    pub analyzed_at: DateTime<Utc>,
    pub strategy: Strategy,
    pub tasks: Vec<Normalized>,
}

impl Session {
    pub fn new(strategy: Strategy, tasks: Vec<Normalized>) -> Self {
        Self {
            schema_version: default_schema_version(),
            analysis_id: Ulid::new().to_string(),
            analyzed_at: Utc::now(),
            strategy,
            tasks,
        }
    }
}

/// File-backed session store rooted at a working directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
    lock_timeout_ms: u64,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    /// Path to the `.triage/` directory
    pub fn dir(&self) -> PathBuf {
        self.root.join(SESSION_DIR)
    }

    /// Path to the session file
    pub fn path(&self) -> PathBuf {
        self.dir().join(SESSION_FILE)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string_pretty(session)?;
        lock::write_atomic_locked(self.path(), json.as_bytes(), self.lock_timeout_ms)?;
        tracing::debug!(
            path = %self.path().display(),
            analysis_id = %session.analysis_id,
            tasks = session.tasks.len(),
            "saved session"
        );
        Ok(())
    }

    /// Load the saved session, if any.
    pub fn load(&self) -> Result<Option<Session>> {
        let path = self.path();
        let Some(content) = lock::read_locked_str(&path, self.lock_timeout_ms)? else {
            return Ok(None);
        };

        let session: Session = serde_json::from_str(&content)?;
        if session.schema_version != SESSION_SCHEMA_VERSION {
            return Err(Error::OperationFailed(format!(
                "unsupported session schema '{}' in {}",
                session.schema_version,
                path.display()
            )));
        }
        Ok(Some(session))
    }

    /// Load the saved session or fail with [`Error::NoAnalysis`].
    pub fn require(&self) -> Result<Session> {
        self.load()?.ok_or_else(|| Error::NoAnalysis(self.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{normalize, RawTask};

    fn sample_tasks() -> Vec<Normalized> {
        vec![
            normalize(&RawTask::new("A").due_date("2025-06-15").importance(8)),
            normalize(&RawTask::new("B").importance("nope").dependencies(["A"])),
        ]
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path());
        let session = Session::new(Strategy::Deadline, sample_tasks());

        store.save(&session).expect("save");
        assert!(store.path().exists());
        let expected = dir.path().join(".triage").join("last_analysis.json");
        assert_eq!(store.path(), expected);

        let loaded = store.load().expect("load").expect("session");
        assert_eq!(loaded, session);
        assert_eq!(loaded.tasks[1].notes, session.tasks[1].notes);
    }

    #[test]
    fn missing_session_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path());
        assert!(store.load().expect("load").is_none());

        let err = store.require().expect_err("no analysis");
        assert!(matches!(err, Error::NoAnalysis(_)));
    }

    #[test]
    fn newer_save_replaces_older() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path());
        let first = Session::new(Strategy::Smart, sample_tasks());
        let second = Session::new(Strategy::Fastest, Vec::new());

        store.save(&first).expect("save first");
        store.save(&second).expect("save second");

        let loaded = store.require().expect("session");
        assert_eq!(loaded.analysis_id, second.analysis_id);
        assert!(loaded.tasks.is_empty());
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path());
        let mut session = Session::new(Strategy::Smart, Vec::new());
        session.schema_version = "triage.session.v0".to_string();
        store.save(&session).expect("save");

        let err = store.load().expect_err("schema");
        assert!(matches!(err, Error::OperationFailed(_)));
    }
}
