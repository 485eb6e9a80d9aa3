//! Console Logger
//!
//! `tracing` subscriber for browser apps. Every formatted event goes to the
//! devtools console (`console.error` / `console.warn` / `console.log` by level,
//! stderr when not running on wasm) and the most recent lines are retained in
//! a circular buffer so the app can show or export them for diagnostics.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Default number of lines kept in the circular buffer
pub const DEFAULT_CAPACITY: usize = 500;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log buffer capacity must be greater than zero")]
    ZeroCapacity,
    #[error("failed to install global subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Shared circular buffer of formatted log lines
#[derive(Clone, Debug)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    /// Capacity is clamped to at least one line
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn guard(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a line, evicting the oldest one when full
    pub fn push(&self, line: String) {
        let mut lines = self.guard();
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Snapshot of the retained lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.guard().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Local wall-clock timestamps, e.g. `14:03:27.512`
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// `MakeWriter` handing out one [`ConsoleLine`] per event
#[derive(Clone, Debug)]
pub struct ConsoleWriter {
    buffer: LogBuffer,
}

impl ConsoleWriter {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine::new(Level::INFO, self.buffer.clone())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleLine::new(*meta.level(), self.buffer.clone())
    }
}

/// Collects the bytes of a single formatted event and emits them on drop
pub struct ConsoleLine {
    level: Level,
    bytes: Vec<u8>,
    buffer: LogBuffer,
}

impl ConsoleLine {
    fn new(level: Level, buffer: LogBuffer) -> Self {
        Self {
            level,
            bytes: Vec::new(),
            buffer,
        }
    }
}

impl io::Write for ConsoleLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.bytes).trim_end().to_string();
        if line.is_empty() {
            return;
        }
        emit(self.level, &line);
        self.buffer.push(line);
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    if level == Level::ERROR {
        web_sys::console::error_1(&value);
    } else if level == Level::WARN {
        web_sys::console::warn_1(&value);
    } else {
        web_sys::console::log_1(&value);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Build the subscriber without installing it
pub fn build_subscriber(
    buffer: &LogBuffer,
    max_level: Level,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_writer(ConsoleWriter::new(buffer.clone()))
        .with_timer(LocalTimer)
        .with_ansi(false)
        .with_max_level(max_level)
        .finish()
}

/// Install the console subscriber globally and return its line buffer
pub fn init_logger(app_name: &str, capacity: usize) -> Result<LogBuffer, LoggerError> {
    if capacity == 0 {
        return Err(LoggerError::ZeroCapacity);
    }
    let max_level = if cfg!(debug_assertions) { Level::DEBUG } else { Level::INFO };
    let buffer = LogBuffer::new(capacity);
    tracing::subscriber::set_global_default(build_subscriber(&buffer, max_level))?;
    tracing::info!(app = app_name, capacity, "logger initialised");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_buffer_evicts_oldest() {
        let buffer = LogBuffer::new(2);
        buffer.push("one".to_string());
        buffer.push("two".to_string());
        buffer.push("three".to_string());

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.lines(), vec!["two".to_string(), "three".to_string()]);
    }

    #[test]
    fn test_console_line_pushes_trimmed_line_on_drop() {
        let buffer = LogBuffer::new(4);
        {
            let mut line = ConsoleLine::new(Level::WARN, buffer.clone());
            line.write_all(b"draft discarded\n").unwrap();
        }
        assert_eq!(buffer.lines(), vec!["draft discarded".to_string()]);
    }

    #[test]
    fn test_empty_line_is_skipped() {
        let buffer = LogBuffer::new(4);
        drop(ConsoleLine::new(Level::INFO, buffer.clone()));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_subscriber_captures_events() {
        let buffer = LogBuffer::new(8);
        let subscriber = build_subscriber(&buffer, Level::DEBUG);

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(key = "task-manager-draft", "unreadable draft");
            tracing::trace!("below max level");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("unreadable draft"));
        assert!(lines[0].contains("task-manager-draft"));
    }

    #[test]
    fn test_buffer_capacity_clamped_to_one() {
        let buffer = LogBuffer::new(0);
        buffer.push("first".to_string());
        buffer.push("second".to_string());

        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.lines(), vec!["second".to_string()]);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(init_logger("test", 0), Err(LoggerError::ZeroCapacity)));
    }
}
