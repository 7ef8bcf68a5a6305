//! Append-only JSON-lines log of served requests.
//!
//! Each call to [`InteractionLog::record`] appends one line:
//!
//! ```text
//! {"timestamp":"2025-03-01T12:00:00Z","operation":"debate","input":{...},"output":{...}}
//! ```
//!
//! The log is write-only. Writes are serialized through a mutex so lines from concurrent
//! requests never interleave.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One line of the log.
#[derive(Debug, Serialize)]
pub struct InteractionRecord<'a> {
    pub timestamp: DateTime<Utc>,
    pub operation: &'a str,
    pub input: &'a serde_json::Value,
    pub output: &'a serde_json::Value,
}

pub struct InteractionLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl InteractionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        InteractionLog {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one interaction. The file is created on first use.
    pub async fn append(
        &self,
        operation: &str,
        input: &serde_json::Value,
        output: &serde_json::Value,
    ) -> io::Result<()> {
        let record = InteractionRecord {
            timestamp: Utc::now(),
            operation,
            input,
            output,
        };
        let mut line = serde_json::to_string(&record)
            .map_err(|e| io::Error::other(format!("Failed to serialize interaction: {}", e)))?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }

    /// Like [`InteractionLog::append`], but a failed write is only logged.
    pub async fn record(
        &self,
        operation: &str,
        input: &serde_json::Value,
        output: &serde_json::Value,
    ) {
        if let Err(err) = self.append(operation, input, output).await {
            log::error!(
                "InteractionLog::record(...): could not write {} entry to {}: {}",
                operation,
                self.path.display(),
                err
            );
        }
    }
}
