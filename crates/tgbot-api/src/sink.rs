//! Failure-logging sinks.
//!
//! The transport reports transport-level failures (connection refused, DNS,
//! TLS, timeout) to an [`ErrorSink`]. Reporting is fire-and-forget: a sink
//! must never panic or surface its own errors to the caller.

use crate::types::{redact_url, Params};
use chrono::Utc;
use log::{error, warn};
use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Receives one call per failed transport request.
pub trait ErrorSink: Send + Sync {
    /// `url` is the full request URL, token included. Implementations that
    /// persist or print it should pass it through [`redact_url`].
    fn log(&self, url: &str, params: &Params, error: &str);
}

/// Sink that drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ErrorSink for NoopSink {
    fn log(&self, _url: &str, _params: &Params, _error: &str) {}
}

/// Sink that forwards reports to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn log(&self, url: &str, params: &Params, err: &str) {
        error!(
            "Telegram request to {} failed: {} (params: {})",
            redact_url(url),
            err,
            serde_json::Value::Object(params.clone())
        );
    }
}

/// Sink that appends one JSON line per failure to a file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl ErrorSink for FileSink {
    fn log(&self, url: &str, params: &Params, err: &str) {
        let entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "url": redact_url(url),
            "params": params,
            "error": err,
        });
        if let Err(e) = self.append(&entry.to_string()) {
            warn!("Could not write to error log {}: {e}", self.path.display());
        }
    }
}
