// Document store
// In-memory collections with an optional TOML snapshot written before each change is published

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::{ProfileChange, ProfileStore, StoreError, StoreResult};
use crate::logger;
use crate::model::{Profile, ProfileFields, User, UserId};

/// Everything the store holds, in the shape written to the data file
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Collections {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    users: Vec<User>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    profiles: Vec<Profile>,
}

/// Document store backed by memory, optionally persisted to a data file
///
/// Writers hold the write lock for the whole change: they edit a copy of
/// the collections, write the snapshot, and only then swap the copy in.
pub struct DocumentStore {
    /// Path of the data file; `None` keeps everything in memory
    data_path: Option<PathBuf>,
    collections: RwLock<Collections>,
}

impl DocumentStore {
    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            data_path: None,
            collections: RwLock::new(Collections::default()),
        }
    }

    /// Open a store persisted at `path`, loading it if the file exists
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let collections = Self::load(&path)?;
        Ok(Self {
            data_path: Some(path),
            collections: RwLock::new(collections),
        })
    }

    fn load(path: &Path) -> StoreResult<Collections> {
        if !path.exists() {
            return Ok(Collections::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let collections: Collections =
            toml::from_str(&content).map_err(|source| StoreError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        logger::log_info(&format!(
            "Loaded {} profile(s) and {} user(s) from {}",
            collections.profiles.len(),
            collections.users.len(),
            path.display()
        ));
        Ok(collections)
    }

    /// Run `change` against a copy of the collections and publish it
    ///
    /// `change` returns its result and whether it modified anything. A
    /// modified copy is written to the data file first; if that fails the
    /// published collections stay untouched.
    async fn commit<T, F>(&self, change: F) -> StoreResult<T>
    where
        T: Send,
        F: FnOnce(&mut Collections) -> (T, bool) + Send,
    {
        let mut current = self.collections.write().await;
        let mut next = current.clone();
        let (out, changed) = change(&mut next);
        if changed {
            self.persist(&next).await?;
            *current = next;
        }
        Ok(out)
    }

    /// Write `collections` to the data file, if there is one
    async fn persist(&self, collections: &Collections) -> StoreResult<()> {
        let Some(path) = &self.data_path else {
            return Ok(());
        };

        let content = toml::to_string_pretty(collections)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| StoreError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        // Write beside the target and rename, so a crash never leaves half a file
        let tmp_path = path.with_extension("toml.tmp");
        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })
    }
}

#[async_trait]
impl ProfileStore for DocumentStore {
    async fn find_profile(&self, user: UserId) -> StoreResult<Option<Profile>> {
        let collections = self.collections.read().await;
        Ok(collections.profiles.iter().find(|p| p.user == user).cloned())
    }

    async fn list_profiles(&self) -> StoreResult<Vec<Profile>> {
        Ok(self.collections.read().await.profiles.clone())
    }

    async fn upsert_profile(&self, fields: ProfileFields) -> StoreResult<Profile> {
        self.commit(move |c| {
            let profile = match c.profiles.iter_mut().find(|p| p.user == fields.user) {
                Some(existing) => {
                    existing.apply(fields);
                    existing.clone()
                }
                None => {
                    let created = Profile::create(fields);
                    c.profiles.push(created.clone());
                    created
                }
            };
            (profile, true)
        })
        .await
    }

    async fn update_profile(
        &self,
        user: UserId,
        change: ProfileChange,
    ) -> StoreResult<Option<Profile>> {
        self.commit(move |c| match c.profiles.iter_mut().find(|p| p.user == user) {
            Some(profile) => {
                let changed = change(profile);
                (Some(profile.clone()), changed)
            }
            None => (None, false),
        })
        .await
    }

    async fn delete_profile(&self, user: UserId) -> StoreResult<bool> {
        self.commit(move |c| {
            let before = c.profiles.len();
            c.profiles.retain(|p| p.user != user);
            let removed = c.profiles.len() != before;
            (removed, removed)
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let collections = self.collections.read().await;
        Ok(collections.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, user: User) -> StoreResult<()> {
        self.commit(move |c| {
            match c.users.iter_mut().find(|u| u.id == user.id) {
                Some(existing) => *existing = user,
                None => c.users.push(user),
            }
            ((), true)
        })
        .await
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<bool> {
        self.commit(move |c| {
            let before = c.users.len();
            c.users.retain(|u| u.id != id);
            let removed = c.users.len() != before;
            (removed, removed)
        })
        .await
    }
}
