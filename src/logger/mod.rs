//! Logger module
//!
//! Thin facade over `tracing` used throughout the service:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - Optional file output

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber from logging configuration
///
/// `RUST_LOG` takes precedence over `logging.level`. Calling this more
/// than once is harmless; later calls keep the first subscriber.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match writer::open(config.log_file.as_deref())? {
        Some(target) => builder.with_ansi(false).with_writer(target).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("logger already initialized: {e}");
    }
    Ok(())
}

pub fn log_info(message: &str) {
    tracing::info!("{message}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Profile service started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    match (&config.storage.data_file, config.storage.persist) {
        (Some(path), true) => tracing::info!("Data file: {path}"),
        _ => tracing::info!("Data file: none (in-memory only)"),
    }
    tracing::info!("Auth users configured: {}", config.auth.users.len());
    tracing::info!("Max body size: {} bytes", config.http.max_body_size);
    tracing::info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_api_request(method: &str, path: &str, status: u16) {
    tracing::debug!("[API] {method} {path} - {status}");
}

pub fn log_shutdown(active_connections: usize) {
    tracing::info!(
        "Shutdown requested, no longer accepting connections ({active_connections} still active)"
    );
}
