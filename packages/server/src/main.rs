use std::path::PathBuf;

use clap::Parser;
use superstar_http::{Server, ServerConfig, Service};

/// Superstar - hierarchical JSON store served over HTTP
#[derive(Parser, Debug)]
#[command(name = "superstar")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8081)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Directory served for GETs outside the data prefix
    #[arg(long, default_value = "../www")]
    document_root: PathBuf,

    /// Snapshot file the document is saved to and restored from
    #[arg(long, default_value = "db.json")]
    snapshot: PathBuf,

    /// Append-only log of every POST body
    #[arg(long, default_value = "superstar.log")]
    audit_log: PathBuf,

    /// URL prefix for path queries
    #[arg(long, default_value = "superstar")]
    prefix: String,

    /// Milliseconds between snapshot saves
    #[arg(long, default_value_t = 20_000)]
    backup_interval_ms: u64,

    /// Longest the server waits for a request before checking the backup timer
    #[arg(long, default_value_t = 500)]
    poll_interval_ms: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            bind: args.bind,
            port: args.port,
            document_root: args.document_root,
            snapshot: args.snapshot,
            audit_log: args.audit_log,
            prefix: args.prefix,
            backup_interval_ms: args.backup_interval_ms,
            poll_interval_ms: args.poll_interval_ms,
        }
    }
}

fn run(config: ServerConfig) -> Result<(), superstar_http::Error> {
    if let Ok(json) = serde_json::to_string(&config) {
        log::debug!("Configuration: {}", json);
    }

    let service = Service::from_config(&config)?;
    let server = Server::bind(&config, service)?;
    server.run()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from(Args::parse());
    if let Err(e) = run(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
