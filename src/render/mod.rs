//! Full HTML pages for the HTTP server.
//!
//! A page is the embedded shell with the committed head, the site chrome and
//! the mounted view's body filled in.

pub mod body;

use crate::{
    config::SiteConfig,
    head::render_head,
    view::{DetailPhase, ListingPhase, View, ViewController},
};
use anyhow::Result;
use body::Chrome;
use chrono::Local;

/// Page shell (embedded at compile time)
const PAGE_TEMPLATE: &str = include_str!("../embed/page.html");

/// A rendered response.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u16,
    pub html: String,
}

/// HTTP status for a view.
pub fn status_of(view: &View) -> u16 {
    match view {
        View::Detail {
            phase: DetailPhase::NotFound,
            ..
        }
        | View::Missing(_) => 404,
        View::Detail {
            phase: DetailPhase::Failed(_),
            ..
        }
        | View::Listing(ListingPhase::Failed(_)) => 503,
        _ => 200,
    }
}

/// Render the controller's current head and view as a complete document.
pub fn render_page(controller: &ViewController, config: &SiteConfig) -> Result<Page> {
    let current = controller.route().map(|r| r.path()).unwrap_or_default();
    let chrome = Chrome {
        site: controller.site(),
        email: &config.base.email,
        current: &current,
        today: Local::now(),
    };

    let head = render_head(controller.head())?;

    let html = fill_template(
        PAGE_TEMPLATE,
        &[
            ("lang", config.base.language.as_str()),
            ("head", &head),
            ("header", &body::header(&chrome)),
            ("footer", &body::footer(&chrome)),
            ("body", &body::view(controller.view(), &chrome)),
        ],
    );

    Ok(Page {
        status: status_of(controller.view()),
        html,
    })
}

/// Fill `{name}` placeholders in a single pass.
///
/// Substituted text is never scanned again, so a post containing `{body}`
/// stays literal. Braces that do not name a known slot (CSS rules) are kept.
fn fill_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let slot = tail.find('}').and_then(|close| {
            let name = &tail[..close];
            slots
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match slot {
            Some((close, value)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        head::policy::tests::site,
        post::tests::sample_post,
        resolve::Resolver,
        store::JsonStore,
        view::Route,
    };

    async fn page_for(path: &str, source: &JsonStore) -> Page {
        let mut controller = ViewController::new(site());
        controller
            .navigate(Route::parse(path), source, &Resolver::default())
            .await;
        render_page(&controller, &SiteConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_post_page() {
        let source = JsonStore::with_posts(vec![sample_post("abc123", Some("ashes-2024"))]);
        let page = page_for("/post/ashes-2024", &source).await;

        assert_eq!(page.status, 200);
        assert!(page.html.starts_with("<!DOCTYPE html>"));
        assert!(page.html.contains("<title>The Ashes 2024 | Cricket Hub</title>"));
        assert!(page.html.contains("application/ld+json"));
        assert!(page.html.contains("<h1>The Ashes 2024</h1>"));
        assert!(!page.html.contains("{body}"));
    }

    #[tokio::test]
    async fn test_not_found_page_status() {
        let page = page_for("/post/nope", &JsonStore::in_memory()).await;
        assert_eq!(page.status, 404);
        assert!(page.html.contains(r#"<meta name="robots" content="noindex"/>"#));
        assert!(!page.html.contains("og:"));
    }

    #[tokio::test]
    async fn test_missing_route_status() {
        let page = page_for("/feed.xml", &JsonStore::in_memory()).await;
        assert_eq!(page.status, 404);
        assert!(page.html.contains("Page Not Found | Cricket Hub"));
    }

    #[tokio::test]
    async fn test_listing_page() {
        let source = JsonStore::with_posts(vec![sample_post("abc123", Some("ashes-2024"))]);
        let page = page_for("/", &source).await;

        assert_eq!(page.status, 200);
        assert!(page.html.contains(r#"href="/post/ashes-2024""#));
        assert!(page.html.contains(r#"<a href="/" aria-current="page">Home</a>"#));
    }

    #[tokio::test]
    async fn test_placeholder_text_in_post_stays_literal() {
        let mut post = sample_post("abc123", Some("ashes-2024"));
        post.title = "Why {footer} matters".into();
        post.meta_description = Some("Read {body} and {head}".into());
        let page = page_for("/post/ashes-2024", &JsonStore::with_posts(vec![post])).await;

        assert!(page.html.contains("<title>Why {footer} matters | Cricket Hub</title>"));
        assert!(page.html.contains("Read {body} and {head}"));
        assert_eq!(page.html.matches("<footer").count(), 1);
        assert_eq!(page.html.matches("<main>").count(), 1);
    }

    #[test]
    fn test_fill_template_single_pass() {
        let filled = fill_template(
            "a {x} b {y} c { margin: 0 } {unknown}",
            &[("x", "{y}"), ("y", "Y")],
        );
        assert_eq!(filled, "a {y} b Y c { margin: 0 } {unknown}");
    }

    #[test]
    fn test_failed_status() {
        assert_eq!(status_of(&View::Listing(ListingPhase::Failed("x".into()))), 503);
        assert_eq!(status_of(&View::Admin), 200);
    }
}
