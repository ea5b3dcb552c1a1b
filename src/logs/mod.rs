//! Per-session conversation logs.
//!
//! Every utterance and reply is appended to `<logs_dir>/<session_id>.jsonl`
//! as one `{ts, role, content}` object per line. The core only appends;
//! listing, reading and renaming exist for the CLI and the REST API.

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::meeting::MessageRole;

pub const LOG_EXTENSION: &str = "jsonl";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Log not found: {0}")]
    NotFound(String),
    #[error("Invalid log name: {0}")]
    InvalidName(String),
    #[error("Log already exists: {0}")]
    AlreadyExists(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type LogResult<T> = std::result::Result<T, LogError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub ts: String,
    pub role: String,
    pub content: String,
}

pub trait LogStore: Send + Sync {
    fn append(&self, session_id: &str, role: MessageRole, content: &str) -> LogResult<()>;

    /// Log file names, sorted.
    fn list(&self) -> LogResult<Vec<String>>;

    /// Raw file content.
    fn read(&self, name: &str) -> LogResult<String>;

    /// `role: content` lines; unreadable lines are skipped.
    fn read_transcript(&self, name: &str) -> LogResult<String> {
        Ok(transcript_from_jsonl(&self.read(name)?))
    }

    /// Renames a log, adding the `.jsonl` extension when missing.
    /// Returns the final name.
    fn rename(&self, old_name: &str, new_name: &str) -> LogResult<String>;
}

pub fn session_log_name(session_id: &str) -> String {
    format!("{}.{}", session_id, LOG_EXTENSION)
}

pub fn transcript_from_jsonl(raw: &str) -> String {
    raw.lines()
        .filter_map(|line| serde_json::from_str::<LogEntry>(line).ok())
        .map(|entry| format!("{}: {}", entry.role, entry.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rejects anything that could escape the logs directory.
fn validate_name(name: &str) -> LogResult<()> {
    let name = name.trim();
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(LogError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// JSONL files in a directory.
pub struct JsonlLogStore {
    dir: PathBuf,
    // Serializes appends so concurrent sessions never interleave partial lines.
    write_lock: Mutex<()>,
}

impl JsonlLogStore {
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create logs directory {:?}", dir))?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> LogResult<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(name.trim()))
    }
}

impl LogStore for JsonlLogStore {
    fn append(&self, session_id: &str, role: MessageRole, content: &str) -> LogResult<()> {
        let path = self.path_for(&session_log_name(session_id))?;
        let entry = LogEntry {
            ts: Utc::now().to_rfc3339(),
            role: role.as_str().to_string(),
            content: content.to_string(),
        };
        let mut line = serde_json::to_string(&entry).context("Failed to serialize log entry")?;
        line.push('\n');

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Log write lock poisoned"))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log {:?}", path))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to append to log {:?}", path))?;

        debug!("Appended {} entry to {:?}", role.as_str(), path);
        Ok(())
    }

    fn list(&self) -> LogResult<Vec<String>> {
        let mut names = Vec::new();
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read logs directory {:?}", self.dir))?;

        for entry in entries {
            let path = entry.context("Failed to read logs directory entry")?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LOG_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> LogResult<String> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(LogError::NotFound(name.to_string()));
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read log {:?}", path))?;
        Ok(content)
    }

    fn rename(&self, old_name: &str, new_name: &str) -> LogResult<String> {
        let old_path = self.path_for(old_name)?;
        if !old_path.exists() {
            return Err(LogError::NotFound(old_name.to_string()));
        }

        let mut final_name = new_name.trim().to_string();
        if !final_name.ends_with(&format!(".{}", LOG_EXTENSION)) {
            final_name = format!("{}.{}", final_name, LOG_EXTENSION);
        }
        let new_path = self.path_for(&final_name)?;
        if new_path.exists() {
            return Err(LogError::AlreadyExists(final_name));
        }

        fs::rename(&old_path, &new_path)
            .with_context(|| format!("Failed to rename {:?} to {:?}", old_path, new_path))?;
        Ok(final_name)
    }
}
