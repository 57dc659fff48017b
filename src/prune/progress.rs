//! Line-oriented progress output.
//!
//! Progress lines are the operator-facing record of a run ("Cleared 12 rows
//! from Page_Versions"). They are plain strings with no schema and are kept
//! apart from `tracing` diagnostics.

use std::{
    io::Write,
    sync::{Mutex, PoisonError},
};

/// Receives progress messages, one line each.
pub trait ProgressSink: Send + Sync {
    fn message(&self, line: &str);
}

/// Writes each message as a line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn message(&self, line: &str) {
        // A closed stdout (e.g. piped into `head`) must not abort a prune run
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    }
}

/// Keeps messages in memory.
#[derive(Debug, Default)]
pub struct BufferedSink {
    lines: Mutex<Vec<String>>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressSink for BufferedSink {
    fn message(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
