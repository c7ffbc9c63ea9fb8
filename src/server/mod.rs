// Server module entry
// Binds the listener and runs the accept loop until a shutdown signal

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

use std::future::Future;
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

pub use listener::create_listener;
pub use server_loop::start_server_loop;

/// Bind the configured address and serve until SIGINT/SIGTERM
pub async fn run(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.get_socket_addr()?;
    let listener = create_listener(addr)?;
    serve(listener, state, signal::shutdown_signal()).await?;
    Ok(())
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) -> std::io::Result<()> {
    let local_addr = listener.local_addr()?;
    logger::log_server_start(&local_addr, &state.config);
    start_server_loop(listener, state, shutdown).await
}
