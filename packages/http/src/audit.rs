//! Append-only record of every POST body.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// One line of the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    pub client: String,
    /// The request body, percent-encoded.
    pub data: String,
}

impl AuditRecord {
    pub fn new(at: DateTime<Utc>, client: impl Into<String>, body: &[u8]) -> Self {
        Self {
            time: at.timestamp_millis(),
            client: client.into(),
            data: urlencoding::encode_binary(body).into_owned(),
        }
    }

    /// Recover the original body bytes.
    pub fn body(&self) -> Vec<u8> {
        urlencoding::decode_binary(self.data.as_bytes()).into_owned()
    }
}

/// The open audit log.
///
/// Each record is written as one JSON line and flushed before `append`
/// returns, so a crash never leaves a partial line behind a completed
/// request.
pub struct AuditLog {
    sink: Box<dyn Write + Send>,
}

impl AuditLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|error| Error::AuditOpen {
                path: path.to_path_buf(),
                error,
            })?;
        Ok(Self::from_writer(file))
    }

    /// Log into an arbitrary writer.
    pub fn from_writer(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    pub fn append(&mut self, record: &AuditRecord) -> io::Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.sink.write_all(&line)?;
        self.sink.flush()
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog").finish_non_exhaustive()
    }
}
