//! JSON file backed post collection.
//!
//! The whole collection is held in memory behind a `RwLock`. A mutation edits
//! a copy, writes it to a sibling temp file on the blocking pool, renames it
//! into place and only then swaps the copy in. A failed write leaves both the
//! file and the visible collection as they were.

use super::{DataSource, StoreError, sort_newest_first};
use crate::{
    post::{Post, PostDraft},
    utils::slug::slugify,
};
use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};
use tokio::sync::Mutex;

/// Length of generated document ids
const ID_LEN: usize = 20;

/// Post collection stored as a JSON array.
#[derive(Debug, Default)]
pub struct JsonStore {
    /// Backing file; `None` keeps the collection in memory only
    path: Option<PathBuf>,
    posts: RwLock<BTreeMap<String, Post>>,
    /// Held across a whole mutation so each one builds on the last commit
    writer: Mutex<()>,
    /// Mixed into generated ids so two posts created in the same instant differ
    counter: AtomicU64,
}

impl JsonStore {
    /// Open the collection at `path`. A missing file is an empty collection.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let posts = if path.exists() {
            let content =
                fs::read_to_string(path).map_err(|err| StoreError::Io(path.to_path_buf(), err))?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<Post>>(&content)
                    .map_err(|err| StoreError::Parse(path.to_path_buf(), err))?
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            posts: RwLock::new(index_by_id(posts)),
            writer: Mutex::new(()),
            counter: AtomicU64::new(0),
        })
    }

    /// A collection that lives only in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// An in-memory collection seeded with `posts`.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(index_by_id(posts)),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.posts.read().len()
    }

    /// Persist `next`, then make it the visible collection.
    ///
    /// Callers hold `writer`. The `RwLock` is only taken for the final swap,
    /// never across the file write.
    async fn commit(&self, next: BTreeMap<String, Post>) -> Result<(), StoreError> {
        if let Some(path) = self.path.clone() {
            let mut sorted: Vec<Post> = next.values().cloned().collect();
            sort_newest_first(&mut sorted);
            let json = serde_json::to_string_pretty(&sorted)?;

            tokio::task::spawn_blocking(move || write_atomic(&path, &json))
                .await
                .map_err(|err| {
                    StoreError::Unavailable(format!("store write task failed: {err}"))
                })??;
        }

        *self.posts.write() = next;
        Ok(())
    }

    /// Copy of the committed collection.
    fn snapshot(&self) -> BTreeMap<String, Post> {
        self.posts.read().clone()
    }

    /// Generate a document id not present in `posts`.
    fn next_id(&self, title: &str, posts: &BTreeMap<String, Post>) -> String {
        loop {
            let mut hasher = blake3::Hasher::new();
            hasher.update(title.as_bytes());
            hasher.update(&Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
            hasher.update(&self.counter.fetch_add(1, Ordering::Relaxed).to_le_bytes());

            let mut id = hex::encode(hasher.finalize().as_bytes());
            id.truncate(ID_LEN);
            if !posts.contains_key(&id) {
                return id;
            }
        }
    }
}

/// Write through a sibling temp file renamed into place.
fn write_atomic(path: &Path, json: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| StoreError::Io(parent.to_path_buf(), err))?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|err| StoreError::Io(tmp.clone(), err))?;
    fs::rename(&tmp, path).map_err(|err| StoreError::Io(path.to_path_buf(), err))?;
    Ok(())
}

fn index_by_id(posts: Vec<Post>) -> BTreeMap<String, Post> {
    posts.into_iter().map(|post| (post.id.clone(), post)).collect()
}

/// Current time as an ISO-8601 timestamp with millisecond precision.
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl DataSource for JsonStore {
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = self.posts.read().values().cloned().collect();
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().get(id).cloned())
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let posts = self.posts.read();
        let found = posts
            .values()
            .find(|post| post.slug.as_deref() == Some(slug))
            .cloned();
        Ok(found)
    }

    async fn create_post(&self, draft: PostDraft) -> Result<Post, StoreError> {
        let title = draft
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(StoreError::MissingTitle)?;

        let slug = match draft.slug.as_deref() {
            Some(slug) => slugify(slug),
            None => slugify(&title),
        };

        let _writer = self.writer.lock().await;
        let mut posts = self.snapshot();
        let mut post = Post {
            id: self.next_id(&title, &posts),
            slug: None,
            title,
            excerpt: String::new(),
            meta_description: None,
            meta_keywords: None,
            image_url: String::new(),
            date: now_iso(),
            author: String::new(),
            content: String::new(),
        };
        draft.apply_to(&mut post);
        post.slug = (!slug.is_empty()).then_some(slug);

        posts.insert(post.id.clone(), post.clone());
        self.commit(posts).await?;
        Ok(post)
    }

    async fn update_post(&self, id: &str, draft: PostDraft) -> Result<Post, StoreError> {
        let _writer = self.writer.lock().await;
        let mut posts = self.snapshot();
        let post = posts
            .get_mut(id)
            .ok_or_else(|| StoreError::Missing(id.to_owned()))?;

        draft.apply_to(post);
        post.id = id.to_owned();
        let updated = post.clone();

        self.commit(posts).await?;
        Ok(updated)
    }

    async fn delete_post(&self, id: &str) -> Result<(), StoreError> {
        let _writer = self.writer.lock().await;
        let mut posts = self.snapshot();
        if posts.remove(id).is_some() {
            self.commit(posts).await?;
        }
        Ok(())
    }
}
