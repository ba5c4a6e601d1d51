//! Post data source.
//!
//! [`DataSource`] is the collaborator boundary between the views and the
//! document store. Queries are async so a slow store suspends the fetching
//! view without blocking anything else.
//!
//! Contract kept by every implementation:
//!
//! - `list_posts` returns newest `date` first
//! - `get_post_by_slug` returns the first match only (slug uniqueness is a
//!   convention, not enforced)
//! - new posts get a creation timestamp; updates never change the id
//! - deletion is immediate and irreversible

mod json;

pub use json::JsonStore;

use crate::post::{Post, PostDraft};
use std::{future::Future, path::PathBuf};
use thiserror::Error;

/// Store-level failures. "No such post" on reads is `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Malformed post collection `{0}`")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Failed to serialize post collection")]
    Serialize(#[from] serde_json::Error),

    #[error("Post `{0}` does not exist")]
    Missing(String),

    #[error("Post needs a title")]
    MissingTitle,

    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

/// Async access to the `posts` collection.
pub trait DataSource: Send + Sync {
    /// All posts, newest first.
    fn list_posts(&self) -> impl Future<Output = Result<Vec<Post>, StoreError>> + Send;

    fn get_post_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Post>, StoreError>> + Send;

    /// First post whose slug equals `slug`.
    fn get_post_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<Post>, StoreError>> + Send;

    /// Insert a post with a fresh id and the current time as its date.
    fn create_post(
        &self,
        draft: PostDraft,
    ) -> impl Future<Output = Result<Post, StoreError>> + Send;

    /// Overwrite the fields `draft` sets. Fails with [`StoreError::Missing`].
    fn update_post(
        &self,
        id: &str,
        draft: PostDraft,
    ) -> impl Future<Output = Result<Post, StoreError>> + Send;

    /// Remove a post. Removing an absent id succeeds.
    fn delete_post(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Order posts newest first.
///
/// ISO-8601 timestamps sort chronologically as strings; ties fall back to the
/// title so the order is stable.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title)));
}
