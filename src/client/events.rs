// Events emitted by the client actions

use crate::model::ProfileView;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Danger,
}

/// A transient notification for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub msg: String,
    pub kind: AlertKind,
}

impl Alert {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: AlertKind::Success,
        }
    }

    pub fn danger(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: AlertKind::Danger,
        }
    }
}

/// State changes reported to the [`Dispatch`](super::Dispatch) sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileEvent {
    ProfileLoaded(ProfileView),
    ProfilesLoaded(Vec<ProfileView>),
    ProfileCleared,
    /// `status` is `None` when no response arrived at all
    ProfileError {
        msg: String,
        status: Option<u16>,
    },
    AccountDeleted,
    Alert(Alert),
}

impl ProfileEvent {
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::ProfileError { .. })
    }
}
