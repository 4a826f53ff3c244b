//! Per-call trace for `--debug` sessions.
//!
//! Each tool invocation produces a call line and then a result or error line.
//! Lines go to `tracing` at debug level under `gsc_mcp::trace`, and to
//! `gsc_mcp_trace_<timestamp>.log` in the temp directory when that file
//! could be created.

use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Payloads longer than this many characters are cut in the trace.
const MAX_PAYLOAD_CHARS: usize = 1000;

/// One traced step of a tool invocation.
enum TraceEvent<'a> {
    Call { tool: &'a str, arguments: String },
    Result { tool: &'a str, body: &'a str },
    Error { tool: &'a str, message: &'a str },
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Call { tool, arguments } => {
                write!(f, "TOOL CALL: {} | params: {}", tool, clip(arguments))
            }
            TraceEvent::Result { tool, body } => {
                write!(f, "TOOL RESULT: {} | result: {}", tool, clip(body))
            }
            TraceEvent::Error { tool, message } => write!(f, "ERROR [{}]: {}", tool, message),
        }
    }
}

struct TraceFile {
    path: PathBuf,
    file: Mutex<File>,
}

impl TraceFile {
    fn create() -> io::Result<Self> {
        let name = format!("gsc_mcp_trace_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
        let path = std::env::temp_dir().join(name);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    fn append(&self, line: &str) {
        // A poisoned lock or a failed write only loses trace lines.
        if let Ok(mut file) = self.file.lock() {
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", stamp, line).and_then(|_| file.flush());
        }
    }
}

/// Records tool invocations when debugging is on; a no-op otherwise.
pub struct DebugLogger {
    enabled: bool,
    sink: Option<TraceFile>,
}

impl DebugLogger {
    pub fn new(enabled: bool) -> Self {
        let sink = if enabled {
            TraceFile::create()
                .map_err(|e| tracing::warn!(error = %e, "trace file unavailable, tracing to logs only"))
                .ok()
        } else {
            None
        };
        Self { enabled, sink }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn trace_path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|sink| sink.path.as_path())
    }

    fn record(&self, event: TraceEvent<'_>) {
        if !self.enabled {
            return;
        }
        let line = event.to_string();
        tracing::debug!(target: "gsc_mcp::trace", "{}", line);
        if let Some(sink) = &self.sink {
            sink.append(&line);
        }
    }

    pub fn log_tool_call(&self, tool: &str, arguments: &serde_json::Value) {
        if self.enabled {
            self.record(TraceEvent::Call {
                tool,
                arguments: arguments.to_string(),
            });
        }
    }

    pub fn log_tool_result(&self, tool: &str, body: &str) {
        self.record(TraceEvent::Result { tool, body });
    }

    pub fn log_error(&self, tool: &str, message: &str) {
        self.record(TraceEvent::Error { tool, message });
    }
}

impl fmt::Debug for DebugLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugLogger")
            .field("enabled", &self.enabled)
            .field("trace_path", &self.trace_path())
            .finish()
    }
}

fn clip(s: &str) -> String {
    match s.char_indices().nth(MAX_PAYLOAD_CHARS) {
        Some((idx, _)) => format!("{}...(truncated)", &s[..idx]),
        None => s.to_string(),
    }
}
