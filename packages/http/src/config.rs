use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub document_root: PathBuf,
    pub snapshot: PathBuf,
    pub audit_log: PathBuf,
    /// Data prefix without slashes.
    pub prefix: String,
    pub backup_interval_ms: u64,
    pub poll_interval_ms: u64,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn backup_interval(&self) -> Duration {
        Duration::from_millis(self.backup_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8081,
            document_root: PathBuf::from("../www"),
            snapshot: PathBuf::from("db.json"),
            audit_log: PathBuf::from("superstar.log"),
            prefix: "superstar".to_string(),
            backup_interval_ms: 20_000,
            poll_interval_ms: 500,
        }
    }
}
