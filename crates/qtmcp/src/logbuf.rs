/*!
Captured host log messages.

The probe redirects the host's log output into a bounded ring buffer at
startup. Writers may be on any thread; reads happen from API handlers.
Oldest entries are evicted first once the buffer is full.
*/

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::Serialize;

/// Severity of a captured log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Debug,
  Info,
  Warning,
  Error,
  Fatal,
}

/// One captured host log message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
  pub severity: Severity,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub file: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub line: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub function: Option<String>,
  /// Milliseconds since the Unix epoch.
  pub timestamp: u64,
}

impl LogEntry {
  pub fn new(severity: Severity, message: impl Into<String>, timestamp: u64) -> Self {
    Self {
      severity,
      message: message.into(),
      file: None,
      line: None,
      function: None,
      timestamp,
    }
  }
}

const DEFAULT_CAPACITY: usize = 1000;

/// Bounded FIFO buffer of captured log entries.
#[derive(Debug)]
pub(crate) struct LogBuffer {
  inner: Mutex<LogState>,
}

#[derive(Debug)]
struct LogState {
  entries: VecDeque<LogEntry>,
  capacity: usize,
  installed: bool,
}

impl LogBuffer {
  pub(crate) fn new() -> Self {
    Self::with_capacity(DEFAULT_CAPACITY)
  }

  pub(crate) fn with_capacity(capacity: usize) -> Self {
    Self {
      inner: Mutex::new(LogState {
        entries: VecDeque::new(),
        capacity,
        installed: false,
      }),
    }
  }

  /// Record whether the host accepted the log redirection.
  pub(crate) fn set_installed(&self, installed: bool) {
    self.inner.lock().installed = installed;
  }

  pub(crate) fn installed(&self) -> bool {
    self.inner.lock().installed
  }

  pub(crate) fn push(&self, entry: LogEntry) {
    let mut state = self.inner.lock();
    while state.entries.len() >= state.capacity {
      state.entries.pop_front();
    }
    state.entries.push_back(entry);
  }

  pub(crate) fn len(&self) -> usize {
    self.inner.lock().entries.len()
  }

  pub(crate) fn clear(&self) {
    self.inner.lock().entries.clear();
  }

  /// Filtered chronological read. `pattern` is a case-insensitive substring
  /// match against the message; `limit` keeps the most recent entries.
  pub(crate) fn query(
    &self,
    pattern: Option<&str>,
    only_errors: bool,
    limit: Option<usize>,
  ) -> Vec<LogEntry> {
    let state = self.inner.lock();
    let needle = pattern.map(str::to_lowercase);
    let mut out: Vec<LogEntry> = state
      .entries
      .iter()
      .filter(|e| !only_errors || e.severity >= Severity::Error)
      .filter(|e| match &needle {
        Some(n) => e.message.to_lowercase().contains(n),
        None => true,
      })
      .cloned()
      .collect();
    if let Some(limit) = limit {
      if out.len() > limit {
        out.drain(..out.len() - limit);
      }
    }
    out
  }
}
