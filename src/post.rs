//! Blog post records.
//!
//! Posts are documents in the store's `posts` collection. Field names are
//! serialized in camelCase so existing exports of the collection load as-is.

use serde::{Deserialize, Serialize};

/// A single blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Store-assigned document id
    #[serde(default)]
    pub id: String,

    /// Human-readable identifier, unique by convention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    pub title: String,

    #[serde(default)]
    pub excerpt: String,

    /// SEO description overriding the excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,

    /// Comma separated keywords for `<meta name="keywords">`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<String>,

    #[serde(default)]
    pub image_url: String,

    /// Creation time as an ISO-8601 timestamp
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub author: String,

    /// Rendered HTML body (trusted, written by admins)
    #[serde(default)]
    pub content: String,
}

impl Post {
    /// Identifier used in `/post/:slug` links: the slug, or the id for
    /// posts created before slugs existed.
    pub fn route_key(&self) -> &str {
        match self.slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug,
            _ => &self.id,
        }
    }

    /// Description for meta tags, preferring the SEO override.
    pub fn description(&self) -> &str {
        match self.meta_description.as_deref() {
            Some(desc) if !desc.is_empty() => desc,
            _ => &self.excerpt,
        }
    }

    /// Keywords, if any were set.
    pub fn keywords(&self) -> Option<&str> {
        self.meta_keywords.as_deref().filter(|k| !k.is_empty())
    }

    /// Calendar date part of the timestamp (`YYYY-MM-DD`).
    pub fn date_ymd(&self) -> &str {
        self.date.get(..10).unwrap_or(&self.date)
    }
}

/// Field values for creating or updating a post.
///
/// `None` leaves a field untouched on update and empty on create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDraft {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub image_url: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
}

impl PostDraft {
    /// Overwrite the fields of `post` that this draft sets.
    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(slug) = self.slug {
            post.slug = Some(slug);
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(desc) = self.meta_description {
            post.meta_description = Some(desc);
        }
        if let Some(keywords) = self.meta_keywords {
            post.meta_keywords = Some(keywords);
        }
        if let Some(image_url) = self.image_url {
            post.image_url = image_url;
        }
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
    }
}
