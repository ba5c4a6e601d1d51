//! Route identifier to post resolution.
//!
//! A `/post/:slug` parameter is either a slug or, for links shared before
//! posts had slugs, a raw document id. Resolution walks an ordered list of
//! strategies and stops at the first hit; each strategy is total (found or
//! not found), so adding a fallback is appending a step.

use crate::{
    post::Post,
    store::{DataSource, StoreError},
};

/// One way of looking up a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `slug == identifier`, first match
    BySlug,
    /// identifier is a document id
    ById,
}

impl Strategy {
    async fn lookup<S: DataSource>(
        self,
        source: &S,
        identifier: &str,
    ) -> Result<Option<Post>, StoreError> {
        match self {
            Self::BySlug => source.get_post_by_slug(identifier).await,
            Self::ById => source.get_post_by_id(identifier).await,
        }
    }
}

/// Ordered lookup strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    strategies: Vec<Strategy>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(vec![Strategy::BySlug, Strategy::ById])
    }
}

impl Resolver {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Resolve `identifier` to a post. `Ok(None)` means not found; a store
    /// failure in any step aborts resolution.
    pub async fn resolve<S: DataSource>(
        &self,
        source: &S,
        identifier: &str,
    ) -> Result<Option<Post>, StoreError> {
        for strategy in &self.strategies {
            if let Some(post) = strategy.lookup(source, identifier).await? {
                return Ok(Some(post));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        post::{PostDraft, tests::sample_post},
        store::JsonStore,
    };

    /// A store whose every query fails.
    pub(crate) struct BrokenStore;

    impl DataSource for BrokenStore {
        async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        async fn get_post_by_id(&self, _id: &str) -> Result<Option<Post>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        async fn get_post_by_slug(&self, _slug: &str) -> Result<Option<Post>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        async fn create_post(&self, _draft: PostDraft) -> Result<Post, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        async fn update_post(&self, _id: &str, _draft: PostDraft) -> Result<Post, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
        async fn delete_post(&self, _id: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    fn store() -> JsonStore {
        JsonStore::with_posts(vec![sample_post("abc123", Some("ashes-2024"))])
    }

    #[tokio::test]
    async fn test_resolve_by_slug() {
        let post = Resolver::default().resolve(&store(), "ashes-2024").await.unwrap();
        assert_eq!(post.map(|p| p.id).as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_id() {
        let post = Resolver::default().resolve(&store(), "abc123").await.unwrap();
        assert_eq!(post.and_then(|p| p.slug).as_deref(), Some("ashes-2024"));
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let post = Resolver::default().resolve(&store(), "missing").await.unwrap();
        assert!(post.is_none());
    }

    #[tokio::test]
    async fn test_slug_wins_over_id() {
        // A post whose slug collides with another post's id
        let source = JsonStore::with_posts(vec![
            sample_post("abc123", Some("ashes-2024")),
            sample_post("other", Some("abc123")),
        ]);
        let post = Resolver::default().resolve(&source, "abc123").await.unwrap();
        assert_eq!(post.map(|p| p.id).as_deref(), Some("other"));
    }

    #[tokio::test]
    async fn test_slug_only_strategy() {
        let resolver = Resolver::new(vec![Strategy::BySlug]);
        assert!(resolver.resolve(&store(), "abc123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let result = Resolver::default().resolve(&BrokenStore, "ashes-2024").await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_default_order() {
        assert_eq!(
            Resolver::default().strategies(),
            &[Strategy::BySlug, Strategy::ById]
        );
    }
}
