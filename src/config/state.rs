// Application state module
// Everything a request handler needs, shared behind one Arc

use std::sync::Arc;

use super::types::Config;
use crate::auth::Authenticator;
use crate::store::SharedStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: SharedStore,
    pub auth: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(config: Config, store: SharedStore, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            config,
            store,
            auth,
        }
    }
}
