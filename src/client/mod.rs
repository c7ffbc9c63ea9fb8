//! Client action layer
//!
//! One async function per profile operation. Each issues a single HTTP
//! call (plus a re-fetch after entry edits) and reports the outcome to the
//! caller's collaborators:
//! - [`Dispatch`] receives [`ProfileEvent`]s
//! - [`Navigator`] is asked to change route after a successful submit
//! - [`Confirm`] gates account deletion

mod actions;
mod events;
mod transport;

use serde::{Deserialize, Serialize};

pub use actions::ProfileActions;
pub use events::{Alert, AlertKind, ProfileEvent};
pub use transport::{ApiClient, ClientError};

/// Where and as whom the client talks to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// e.g. `http://127.0.0.1:5000`
    pub base_url: String,
    /// Sent as `x-auth-token` when set
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Receives the events produced by an action
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, event: ProfileEvent);
}

/// Route changes requested by an action
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

/// Yes/no prompt shown before destructive actions
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}
