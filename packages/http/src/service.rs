//! All process-wide state and the per-request pipeline.

use std::time::{Duration, Instant};

use chrono::Utc;
use http::Method;
use log::{debug, info, warn};
use serde_json::Value;
use superstar_core_store::{Path, PathError};
use superstar_json_store::{DocumentStore, SnapshotFile};

use crate::audit::{AuditLog, AuditRecord};
use crate::config::ServerConfig;
use crate::documents::StaticFiles;
use crate::error::RequestError;
use crate::router::{classify, Route};
use crate::schedule::BackupSchedule;
use crate::types::{split_target, Exchange, Reply};
use crate::Error;

/// The document, its audit log and backup timer, and the static site.
///
/// Owned by the transport loop, which hands it one request at a time and
/// calls [`Service::maintain`] between requests.
#[derive(Debug)]
pub struct Service {
    store: DocumentStore,
    audit: AuditLog,
    documents: StaticFiles,
    schedule: BackupSchedule,
    prefix: String,
}

impl Service {
    pub fn new(
        store: DocumentStore,
        audit: AuditLog,
        documents: StaticFiles,
        prefix: impl Into<String>,
        backup_interval: Duration,
    ) -> Self {
        Self {
            store,
            audit,
            documents,
            schedule: BackupSchedule::new(backup_interval, Instant::now()),
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Open the audit log and restore the document from its snapshot.
    ///
    /// Only the audit log is required. A snapshot that is missing or
    /// unreadable leaves the document empty.
    pub fn from_config(config: &ServerConfig) -> Result<Self, Error> {
        let audit = AuditLog::open(&config.audit_log)?;

        let mut store = DocumentStore::with_snapshot(SnapshotFile::new(&config.snapshot));
        match store.load() {
            Ok(true) => info!("Loaded backup database."),
            Ok(false) => info!("No backup database found."),
            Err(e) => warn!("Could not load backup database: {}", e),
        }

        Ok(Self::new(
            store,
            audit,
            StaticFiles::new(&config.document_root),
            &config.prefix,
            config.backup_interval(),
        ))
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Serve one request. Any failure becomes `400 Bad Request`.
    pub fn handle(&mut self, exchange: &mut dyn Exchange) -> Reply {
        match self.route(exchange) {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Bad request from {}: {}", exchange.client(), e);
                Reply::bad_request()
            }
        }
    }

    fn route(&mut self, exchange: &mut dyn Exchange) -> Result<Reply, RequestError> {
        let method = exchange.method().map_err(RequestError::Method)?;
        let client = exchange.client();
        let (path, query) = split_target(exchange.target());
        let (path, query) = (path.to_string(), query.to_string());
        info!("{} {} {} {}", client, method, path, query);

        let body = if method == Method::POST {
            let body = exchange.read_body().map_err(RequestError::Body)?;
            self.audit
                .append(&AuditRecord::new(Utc::now(), client, &body))
                .map_err(RequestError::Audit)?;
            body
        } else {
            Vec::new()
        };

        match classify(&method, &path, &self.prefix) {
            Route::PathQuery(rest) => {
                // Too long to name any node; only undecodable paths are errors.
                let node = match Path::from_uri(rest) {
                    Ok(path) => self.store.query(&path),
                    Err(PathError::InvalidPath { .. }) => Value::Null,
                    Err(e) => return Err(e.into()),
                };
                Ok(Reply::ok(serde_json::to_vec(&node)?))
            }
            Route::RpcCommand => {
                let reply = superstar_rpc::handle_raw_request(&body, &mut self.store);
                Ok(Reply::ok(reply.to_body()))
            }
            Route::DocumentFetch(path) => self.documents.fetch(path),
            Route::Rejected => Ok(Reply::method_not_allowed()),
        }
    }

    /// Save the document if the backup interval has elapsed.
    ///
    /// Returns whether a save was attempted. Failures are logged and wait
    /// for the next interval.
    pub fn maintain(&mut self, now: Instant) -> bool {
        if !self.schedule.poll(now) {
            return false;
        }

        match self.store.save() {
            Ok(true) => info!("Saved backup database."),
            Ok(false) => debug!("No snapshot file configured, skipping backup"),
            Err(e) => warn!("Could not save backup database: {}", e),
        }
        true
    }
}
