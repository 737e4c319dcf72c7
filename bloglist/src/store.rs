//! Document store for users and blogs.
//!
//! [`DocumentStore`] keeps both collections in memory behind one lock, so
//! every single-document write is atomic. With a data file it also loads a
//! JSON snapshot at startup and rewrites it after each write. A write only
//! becomes visible once its snapshot is on disk.

use std::{
    fmt::Debug,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::model::{Blog, BlogUpdate, Id, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("owner {0} does not exist")]
    UnknownOwner(Id),

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait BlogStore: Send + Sync + Debug {
    async fn blogs(&self) -> StoreResult<Vec<Blog>>;
    async fn blog(&self, id: Id) -> StoreResult<Option<Blog>>;
    /// Persists `blog` and records it on its owner's blog list.
    async fn insert_blog(&self, blog: Blog) -> StoreResult<Blog>;
    async fn update_blog(&self, id: Id, update: BlogUpdate) -> StoreResult<Option<Blog>>;
    /// Removes the blog and its entry on the owner's list; `None` if absent.
    async fn delete_blog(&self, id: Id) -> StoreResult<Option<Blog>>;

    async fn users(&self) -> StoreResult<Vec<User>>;
    async fn user(&self, id: Id) -> StoreResult<Option<User>>;
    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn insert_user(&self, user: User) -> StoreResult<User>;

    /// Empties both collections.
    async fn reset(&self) -> StoreResult<()>;
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Collections {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    blogs: Vec<Blog>,
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    data: RwLock<Collections>,
    snapshot: Option<PathBuf>,
}

impl DocumentStore {
    /// Memory-only store.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Store backed by a JSON snapshot at `path`; a missing file starts empty.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Collections::default(),
            Err(err) => return Err(err.into()),
        };
        info!(
            path = %path.display(),
            users = data.users.len(),
            blogs = data.blogs.len(),
            "document store opened"
        );

        Ok(Self {
            data: RwLock::new(data),
            snapshot: Some(path),
        })
    }

    /// Applies `change` under the write lock. With a snapshot the change is
    /// made on a copy, and the copy replaces the live data only after it has
    /// been written out.
    async fn commit<T, F>(&self, change: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Collections) -> StoreResult<T> + Send,
        T: Send,
    {
        let mut data = self.data.write().await;
        let Some(path) = &self.snapshot else {
            return change(&mut *data);
        };

        let mut next = data.clone();
        let out = change(&mut next)?;
        write_snapshot(path, &next).await?;
        *data = next;
        Ok(out)
    }
}

async fn write_snapshot(path: &Path, data: &Collections) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, serde_json::to_vec_pretty(data)?).await?;
    tokio::fs::rename(&tmp, path).await?;
    debug!(path = %path.display(), "snapshot written");
    Ok(())
}

#[async_trait]
impl BlogStore for DocumentStore {
    async fn blogs(&self) -> StoreResult<Vec<Blog>> {
        Ok(self.data.read().await.blogs.clone())
    }

    async fn blog(&self, id: Id) -> StoreResult<Option<Blog>> {
        let data = self.data.read().await;
        Ok(data.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_blog(&self, blog: Blog) -> StoreResult<Blog> {
        self.commit(move |data| {
            let owner = data
                .users
                .iter_mut()
                .find(|u| u.id == blog.user)
                .ok_or(StoreError::UnknownOwner(blog.user))?;
            owner.blogs.push(blog.id);
            data.blogs.push(blog.clone());
            Ok(blog)
        })
        .await
    }

    async fn update_blog(&self, id: Id, update: BlogUpdate) -> StoreResult<Option<Blog>> {
        self.commit(move |data| {
            let Some(blog) = data.blogs.iter_mut().find(|b| b.id == id) else {
                return Ok(None);
            };
            update.apply(blog);
            Ok(Some(blog.clone()))
        })
        .await
    }

    async fn delete_blog(&self, id: Id) -> StoreResult<Option<Blog>> {
        self.commit(move |data| {
            let Some(pos) = data.blogs.iter().position(|b| b.id == id) else {
                return Ok(None);
            };
            let removed = data.blogs.remove(pos);
            if let Some(owner) = data.users.iter_mut().find(|u| u.id == removed.user) {
                owner.blogs.retain(|b| *b != id);
            }
            Ok(Some(removed))
        })
        .await
    }

    async fn users(&self) -> StoreResult<Vec<User>> {
        Ok(self.data.read().await.users.clone())
    }

    async fn user(&self, id: Id) -> StoreResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        self.commit(move |data| {
            if data.users.iter().any(|u| u.username == user.username) {
                return Err(StoreError::DuplicateUsername(user.username));
            }
            data.users.push(user.clone());
            Ok(user)
        })
        .await
    }

    async fn reset(&self) -> StoreResult<()> {
        self.commit(|data| {
            *data = Collections::default();
            Ok(())
        })
        .await
    }
}
