//! Event logging for scaffold runs.
//!
//! When `--log <FILE>` (or `SCAFFOLD_LOG`) is set, every run appends an audit
//! trail to that file in NDJSON format (one JSON object per line).
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: `plan`, `write`, `hook`, `complete` or `fail`
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `source`: Optional template source directory
//! - `details`: Freeform object with action-specific details

use crate::error::{Result, ScaffoldError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Files selected and rendered in memory
    Plan,
    /// Output files written (with any failures)
    Write,
    /// A post hook ran
    Hook,
    /// Run finished successfully
    Complete,
    /// Run aborted with an error
    Fail,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Plan => write!(f, "plan"),
            EventAction::Write => write!(f, "write"),
            EventAction::Hook => write!(f, "hook"),
            EventAction::Complete => write!(f, "complete"),
            EventAction::Fail => write!(f, "fail"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    /// The actor who ran scaffold (e.g., `user@HOST`).
    pub actor: String,

    /// Template source directory, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            source: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_source(mut self, source: &Path) -> Self {
        self.source = Some(source.display().to_string());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            ScaffoldError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event as one JSON line to `path`, creating the file if needed.
pub fn append_event(path: &Path, event: &Event) -> Result<()> {
    let json_line = event.to_ndjson_line()?;

    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.exists()
    {
        fs::create_dir_all(dir).map_err(|e| {
            ScaffoldError::UserError(format!(
                "failed to create log directory '{}': {}",
                dir.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            ScaffoldError::UserError(format!(
                "failed to open event log '{}': {}",
                path.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        ScaffoldError::UserError(format!(
            "failed to write event to '{}': {}",
            path.display(),
            e
        ))
    })?;

    Ok(())
}

/// Optional event sink for one run.
///
/// Logging is best effort: a failed append is reported as a warning and
/// never changes the outcome of the run.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    path: Option<PathBuf>,
    source: Option<PathBuf>,
}

impl EventLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path, source: None }
    }

    /// Stamp every recorded event with the template source directory.
    pub fn for_source(mut self, source: &Path) -> Self {
        self.source = Some(source.to_path_buf());
        self
    }

    pub fn record(&self, action: EventAction, details: Value) {
        let Some(path) = &self.path else {
            return;
        };

        let mut event = Event::new(action).with_details(details);
        if let Some(source) = &self.source {
            event = event.with_source(source);
        }

        if let Err(e) = append_event(path, &event) {
            warn!(action = %action, error = %e, "failed to append event");
        }
    }
}
