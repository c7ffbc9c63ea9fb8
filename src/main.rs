use std::sync::Arc;

use profile_service::auth::{self, TokenAuthenticator};
use profile_service::config::{AppState, Config};
use profile_service::store::{DocumentStore, ProfileStore, SharedStore};
use profile_service::{logger, server};

/// Config file used when no path is given (extension optional)
const DEFAULT_CONFIG: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    // Build the runtime with the configured number of worker threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&cfg)?;

    // Accounts live outside this service; configured users stand in for them
    for user in auth::configured_users(&cfg.auth.users)? {
        if store.find_user(user.id).await?.is_none() {
            store.insert_user(user).await?;
        }
    }
    let authenticator = TokenAuthenticator::from_config(&cfg.auth.users)?;
    if authenticator.is_empty() {
        logger::log_warning("No auth users configured; protected routes will reject every request");
    }

    let state = Arc::new(AppState::new(cfg, store, Arc::new(authenticator)));
    server::run(state).await
}

fn open_store(cfg: &Config) -> Result<SharedStore, Box<dyn std::error::Error>> {
    match (&cfg.storage.data_file, cfg.storage.persist) {
        (Some(path), true) => Ok(Arc::new(DocumentStore::open(path)?)),
        _ => Ok(Arc::new(DocumentStore::in_memory())),
    }
}
