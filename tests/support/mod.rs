#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use chrono::{Duration, Local};
use serde_json::Value;
use tempfile::TempDir;

pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Write `tasks` as `tasks.json` and return its path.
    pub fn write_tasks(&self, tasks: &Value) -> std::io::Result<PathBuf> {
        self.write_file("tasks.json", &tasks.to_string())
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file(".triage.toml", contents)
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join(".triage").join("last_analysis.json")
    }

    /// `triage` running inside this directory.
    pub fn cmd(&self) -> Command {
        let mut cmd = triage_cmd();
        cmd.current_dir(self.path());
        cmd
    }
}

pub fn triage_cmd() -> Command {
    let mut cmd = Command::cargo_bin("triage").expect("binary");
    cmd.env_remove("TRIAGE_DIR").env_remove("RUST_LOG");
    cmd
}

/// ISO date `days` from the local today.
pub fn iso_in(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// Parse a command's stdout as JSON.
pub fn stdout_json(output: &std::process::Output) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(&output.stdout)
}
