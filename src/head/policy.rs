//! What the head should say for each view.
//!
//! Every function takes a [`HeadState`] by value and returns the next one, so
//! the policy is testable without any rendering environment. Titles and
//! suffixes follow the site name from `[base]`.

use super::{HeadState, MetaAttr};
use crate::{config::SiteConfig, post::Post};
use serde_json::json;

const TWITTER_CARD: &str = "summary_large_image";

/// Site-level values the policy needs, copied out of the config.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteMeta {
    pub name: String,
    pub headline: String,
    pub description: String,
    pub summary: String,
    /// Origin without trailing slash
    pub origin: String,
    pub image: String,
    pub logo: String,
}

impl SiteMeta {
    pub fn from_config(config: &SiteConfig) -> Self {
        let base = &config.base;
        Self {
            name: base.title.clone(),
            headline: base.headline.clone(),
            description: base.description.clone(),
            summary: base.summary.clone(),
            origin: base.origin().to_owned(),
            image: base.image.clone(),
            logo: base.logo.clone(),
        }
    }

    /// Absolute URL of a post detail page.
    pub fn post_url(&self, post: &Post) -> String {
        format!("{}/post/{}", self.origin, post.route_key())
    }

    fn page_title(&self, page: &str) -> String {
        format!("{page} | {}", self.name)
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Site-level tags for the article listing.
///
/// Drops structured data and any `robots` restriction left by the previous
/// view, such as the admin page's `noindex`.
pub fn apply_listing(mut head: HeadState, site: &SiteMeta) -> HeadState {
    head.set_title(site.headline.clone());
    head.set_meta(MetaAttr::Name, "description", site.description.clone());
    head.set_meta(MetaAttr::Property, "og:title", site.headline.clone());
    head.set_meta(MetaAttr::Property, "og:description", site.summary.clone());
    head.set_meta(MetaAttr::Property, "og:type", "website");
    head.set_meta(MetaAttr::Property, "og:url", site.origin.clone());
    head.set_meta(MetaAttr::Property, "og:image", site.image.clone());
    head.set_meta(MetaAttr::Name, "twitter:card", TWITTER_CARD);
    head.set_link("canonical", site.origin.clone());
    head.remove_structured_data();
    head.remove_meta(MetaAttr::Name, "robots");
    head
}

// ============================================================================
// Post Detail
// ============================================================================

/// Remove per-article tags. Runs on entering `Loading` and on unmount.
pub fn clear_detail(mut head: HeadState) -> HeadState {
    head.remove_structured_data();
    head.remove_meta(MetaAttr::Name, "keywords");
    head
}

/// Article tags for a resolved post.
pub fn apply_post(mut head: HeadState, post: &Post, site: &SiteMeta) -> HeadState {
    let post_url = site.post_url(post);
    let description = post.description();

    head.set_title(site.page_title(&post.title));
    head.set_meta(MetaAttr::Name, "description", description);
    head.set_meta(MetaAttr::Property, "og:title", post.title.clone());
    head.set_meta(MetaAttr::Property, "og:description", description);
    head.set_meta(MetaAttr::Property, "og:type", "article");
    head.set_meta(MetaAttr::Property, "og:url", post_url.clone());
    head.set_meta(MetaAttr::Property, "og:image", post.image_url.clone());
    head.set_meta(MetaAttr::Name, "twitter:card", TWITTER_CARD);
    head.set_link("canonical", post_url);
    head.remove_meta(MetaAttr::Name, "robots");

    if let Some(keywords) = post.keywords() {
        head.set_meta(MetaAttr::Name, "keywords", keywords);
    }

    head.set_structured_data(article_data(post, site));
    head
}

/// Unknown identifier: keep it out of search indexes and social previews.
pub fn apply_not_found(head: HeadState, site: &SiteMeta) -> HeadState {
    let mut head = strip_sharing(head);
    head.set_title(site.page_title("Post Not Found"));
    head.set_meta(MetaAttr::Name, "robots", "noindex");
    head
}

/// The data source failed; the page is a transient error, never indexed.
pub fn apply_failed(head: HeadState, site: &SiteMeta) -> HeadState {
    let mut head = strip_sharing(head);
    head.set_title(site.page_title("Something Went Wrong"));
    head.set_meta(MetaAttr::Name, "robots", "noindex");
    head
}

/// schema.org Article block.
fn article_data(post: &Post, site: &SiteMeta) -> serde_json::Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": post.title,
        "image": post.image_url,
        "datePublished": post.date,
        "author": {
            "@type": "Person",
            "name": post.author,
        },
        "publisher": {
            "@type": "Organization",
            "name": site.name,
            "logo": {
                "@type": "ImageObject",
                "url": site.logo,
            },
        },
        "description": post.description(),
    })
}

/// Drop everything that would describe a shareable resource.
fn strip_sharing(mut head: HeadState) -> HeadState {
    for property in ["og:title", "og:description", "og:type", "og:url", "og:image"] {
        head.remove_meta(MetaAttr::Property, property);
    }
    head.remove_meta(MetaAttr::Name, "twitter:card");
    head.remove_link("canonical");
    clear_detail(head)
}

// ============================================================================
// Static, Admin and Missing Pages
// ============================================================================

/// About, Contact and Privacy pages: followed but not indexed.
pub fn apply_static_page(mut head: HeadState, page: &str, site: &SiteMeta) -> HeadState {
    head.set_title(site.page_title(page));
    head.set_meta(MetaAttr::Name, "robots", "noindex, follow");
    head
}

/// Unmount of a static page.
pub fn clear_static_page(mut head: HeadState) -> HeadState {
    head.remove_meta(MetaAttr::Name, "robots");
    head
}

/// Admin login page. Its `noindex` is not cleaned up on unmount; the
/// listing removes it.
pub fn apply_admin(mut head: HeadState, site: &SiteMeta) -> HeadState {
    head.set_title(site.page_title("Admin Login"));
    head.set_meta(MetaAttr::Name, "robots", "noindex, nofollow");
    head
}

/// Paths matching no route.
pub fn apply_missing(head: HeadState, site: &SiteMeta) -> HeadState {
    let mut head = strip_sharing(head);
    head.set_title(site.page_title("Page Not Found"));
    head.set_meta(MetaAttr::Name, "robots", "noindex");
    head
}
