use std::io;
use std::path::PathBuf;

use superstar_core_store::PathError;
use superstar_json_store::SnapshotError;
use superstar_rpc::RpcError;

/// Errors from the client, server setup and persistence.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not listen on {addr}: {message}")]
    Bind { addr: String, message: String },

    #[error("Could not open audit log {}: {}", .path.display(), .error)]
    AuditOpen { path: PathBuf, error: io::Error },
}

/// Why a single request could not be served.
///
/// Every variant becomes a `400 Bad Request` with an empty body.
#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    #[error("could not read request body: {0}")]
    Body(#[source] io::Error),

    #[error("undecodable path: {0}")]
    Path(#[from] PathError),

    #[error("unsupported method token '{0}'")]
    Method(String),

    #[error("could not append audit record: {0}")]
    Audit(#[source] io::Error),

    #[error("could not serve document: {0}")]
    Document(#[source] io::Error),

    #[error("could not serialize reply: {0}")]
    Json(#[from] serde_json::Error),
}
