//! Persistence module
//!
//! The [`ProfileStore`] trait is the boundary to the document store. Route
//! handlers only ever see `Arc<dyn ProfileStore>`; [`DocumentStore`] is the
//! bundled implementation (in memory, optionally snapshotted to a TOML file).

mod document;

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::model::{Profile, ProfileFields, User, UserId};

pub use document::DocumentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse data file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize documents: {0}")]
    Encode(#[from] toml::ser::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// In-place edit of a stored profile; returns whether anything changed
pub type ProfileChange = Box<dyn FnOnce(&mut Profile) -> bool + Send>;

/// Document store operations used by the profile routes
///
/// Profiles are keyed by their owning user; every method is a single
/// atomic operation, but nothing spans two calls. A failed write leaves
/// the stored documents as they were.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profile owned by `user`, if any
    async fn find_profile(&self, user: UserId) -> StoreResult<Option<Profile>>;

    /// All profiles in creation order
    async fn list_profiles(&self) -> StoreResult<Vec<Profile>>;

    /// Create the profile for `fields.user`, or overwrite its fields if it exists
    async fn upsert_profile(&self, fields: ProfileFields) -> StoreResult<Profile>;

    /// Apply `change` to the profile owned by `user` in one atomic step
    ///
    /// Returns `None` when there is no such profile; nothing is created.
    /// The change reports whether it modified the profile, and only then is
    /// it written back.
    async fn update_profile(&self, user: UserId, change: ProfileChange)
        -> StoreResult<Option<Profile>>;

    /// Remove the profile owned by `user`, returning whether one existed
    async fn delete_profile(&self, user: UserId) -> StoreResult<bool>;

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Insert or replace a user record
    async fn insert_user(&self, user: User) -> StoreResult<()>;

    /// Remove a user record, returning whether one existed
    async fn delete_user(&self, id: UserId) -> StoreResult<bool>;
}

pub type SharedStore = Arc<dyn ProfileStore>;
