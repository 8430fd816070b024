//! Run accounting: counters and diagnostic lines for one mirror run.

use std::time::{Duration, SystemTime};

use serde::Serialize;
use uuid::Uuid;

/// Mutable accumulator for a single mirror run.
///
/// Created once per run, threaded by mutable reference through every
/// recursive traversal call, and read out at the end by the caller's
/// reporter. Counters only ever increase, with one deliberate exception:
/// a failed copy whose fallback comparison proves the destination already
/// matches undoes its pending `should_copy` increment.
///
/// Invariant: `copies_succeeded <= should_copy <= files_checked`, and
/// `errors` counts terminal per-item failures only (never unchanged skips).
#[derive(Debug)]
pub struct RunReport {
    /// Unique identifier for this run.
    pub id: Uuid,

    /// Regular files examined.
    pub files_checked: u64,

    /// Directories whose enumeration completed.
    pub folders_checked: u64,

    /// Files judged stale and queued for copying.
    pub should_copy: u64,

    /// Copies that completed.
    pub copies_succeeded: u64,

    /// Terminal per-item failures.
    pub errors: u64,

    /// When the run started.
    pub started_at: SystemTime,

    /// When the run finished, once [`finish`](Self::finish) is called.
    pub finished_at: Option<SystemTime>,

    diagnostics: Vec<String>,
}

impl RunReport {
    pub fn new() -> Self {
        RunReport {
            id: Uuid::new_v4(),
            files_checked: 0,
            folders_checked: 0,
            should_copy: 0,
            copies_succeeded: 0,
            errors: 0,
            started_at: SystemTime::now(),
            finished_at: None,
            diagnostics: Vec::new(),
        }
    }

    /// Record a terminal per-item failure with its diagnostic line.
    pub fn record_error(&mut self, message: String) {
        self.errors += 1;
        self.diagnostics.push(message);
    }

    /// Diagnostic lines, in the order they were recorded.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Stamp the end of the run.
    pub fn finish(&mut self) {
        self.finished_at = Some(SystemTime::now());
    }

    /// Wall-clock duration of the run so far (or total, once finished).
    pub fn elapsed(&self) -> Duration {
        let end = self.finished_at.unwrap_or_else(SystemTime::now);
        end.duration_since(self.started_at).unwrap_or(Duration::ZERO)
    }

    /// Snapshot of the final counters, suitable for serialization.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.id,
            files_checked: self.files_checked,
            folders_checked: self.folders_checked,
            should_copy: self.should_copy,
            copies_succeeded: self.copies_succeeded,
            errors: self.errors,
            elapsed_secs: self.elapsed().as_secs_f64(),
        }
    }
}

impl Default for RunReport {
    fn default() -> Self {
        RunReport::new()
    }
}

/// Serializable snapshot of a run's final counters.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub files_checked: u64,
    pub folders_checked: u64,
    pub should_copy: u64,
    pub copies_succeeded: u64,
    pub errors: u64,
    pub elapsed_secs: f64,
}
