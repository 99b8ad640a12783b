// Test support utilities for both unit and integration tests

use std::sync::Mutex;

use crate::joblog::{JobLog, LogLevel};

/// One captured log call.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub subject: Option<String>,
}

/// Job log that records messages in memory instead of reporting to a
/// scheduler.
///
/// Useful for asserting on the warnings emitted by best-effort import steps
/// without external dependencies.
#[derive(Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Messages logged at one level, in order
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// Whether any message at the level contains the fragment
    pub fn contains(&self, level: LogLevel, fragment: &str) -> bool {
        self.messages_at(level)
            .iter()
            .any(|message| message.contains(fragment))
    }
}

impl JobLog for RecordingLog {
    fn log(&self, level: LogLevel, message: &str, subject: Option<&str>) {
        self.entries.lock().unwrap().push(LogEntry {
            level,
            message: message.to_string(),
            subject: subject.map(str::to_string),
        });
    }
}
