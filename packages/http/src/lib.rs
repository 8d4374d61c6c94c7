//! # superstar-http
//!
//! The HTTP face of Superstar.
//!
//! - [`Service`] owns the document, the audit log and the backup timer, and
//!   turns one request into one [`Reply`].
//! - [`Server`] runs the `tiny_http` loop around a `Service`.
//! - [`SuperstarClient`] talks to a running server.
//!
//! | request                   | reply                               |
//! |---------------------------|-------------------------------------|
//! | `GET /superstar/<path>`   | `200`, the node as JSON (`null` when absent) |
//! | `GET /<anything else>`    | static file from the document root  |
//! | `POST /<any>`             | `200`, JSON-RPC response            |
//! | any other method          | `405`, empty                        |
//! | anything that goes wrong  | `400`, empty                        |
//!
//! The data prefix matches only as a whole path segment: `/superstar` and
//! `/superstar/a` are path queries, while `/superstarfoo/a` is a static file
//! request, not the bare string-prefix match older servers used.

pub mod audit;
pub mod client;
pub mod config;
pub mod documents;
pub mod error;
pub mod router;
pub mod schedule;
pub mod server;
pub mod service;
pub mod types;

pub use audit::{AuditLog, AuditRecord};
pub use client::SuperstarClient;
pub use config::ServerConfig;
pub use documents::StaticFiles;
pub use error::{Error, RequestError};
pub use router::{classify, Route};
pub use schedule::{BackupSchedule, BackupState};
pub use server::Server;
pub use service::Service;
pub use types::{Exchange, Reply};
