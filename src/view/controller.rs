//! Per-route view lifecycle and head synchronization.
//!
//! The controller owns the [`HeadState`] and the state of the mounted view.
//! A route change runs in a fixed order:
//!
//! ```text
//! mount(route)
//!   ├─ unmount cleanup of the previous view
//!   ├─ entry cleanup + loading state            (synchronous)
//!   └─ Fetch { ticket(token), request }  ──▶  caller runs it
//!
//! complete(Completion { ticket, outcome })
//!   ├─ ticket.token != active token  ──▶  Stale, nothing touched
//!   └─ apply head policy + view state
//! ```
//!
//! Every fetch carries a fresh [`RequestToken`]. Mounting another route makes
//! the previous token inactive, so a result that arrives late for a route the
//! user already left is discarded instead of overwriting newer tags.

use super::route::{Route, StaticPage};
use crate::{
    head::{
        HeadState,
        policy::{self, SiteMeta},
    },
    log,
    post::Post,
    resolve::Resolver,
    store::{DataSource, StoreError},
};
use std::{fmt, mem};

// ============================================================================
// Fetch Plumbing
// ============================================================================

/// Monotonic identity of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which route a fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub token: RequestToken,
    pub route: Route,
}

/// What a view needs loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListPosts,
    Resolve(String),
}

/// A fetch the caller must run and hand back through
/// [`ViewController::complete`].
#[derive(Debug, Clone)]
pub struct Fetch {
    pub ticket: Ticket,
    pub request: Request,
}

impl Fetch {
    pub async fn run<S: DataSource>(self, source: &S, resolver: &Resolver) -> Completion {
        let outcome = match &self.request {
            Request::ListPosts => Outcome::Posts(source.list_posts().await),
            Request::Resolve(identifier) => {
                Outcome::Post(resolver.resolve(source, identifier).await)
            }
        };
        Completion {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// Result of a fetch.
#[derive(Debug)]
pub enum Outcome {
    Posts(Result<Vec<Post>, StoreError>),
    Post(Result<Option<Post>, StoreError>),
}

/// A finished fetch, tagged with the ticket it was issued under.
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

/// Whether a completion changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

// ============================================================================
// View State
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ListingPhase {
    Loading,
    Ready(Vec<Post>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPhase {
    Loading,
    Displaying(Post),
    NotFound,
    /// The data source failed; carries the error message
    Failed(String),
}

/// State of the mounted view.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Nothing mounted
    Blank,
    Listing(ListingPhase),
    Detail { slug: String, phase: DetailPhase },
    Static(StaticPage),
    Admin,
    Missing(String),
}

impl View {
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            Self::Listing(ListingPhase::Loading)
                | Self::Detail {
                    phase: DetailPhase::Loading,
                    ..
                }
        )
    }
}

// ============================================================================
// Controller
// ============================================================================

pub struct ViewController {
    site: SiteMeta,
    head: HeadState,
    route: Option<Route>,
    view: View,
    last_token: u64,
    active: Option<RequestToken>,
}

impl ViewController {
    pub fn new(site: SiteMeta) -> Self {
        Self::with_head(site, HeadState::new())
    }

    /// Start from an existing head, e.g. one carried over from another view.
    pub fn with_head(site: SiteMeta, head: HeadState) -> Self {
        Self {
            site,
            head,
            route: None,
            view: View::Blank,
            last_token: 0,
            active: None,
        }
    }

    pub fn head(&self) -> &HeadState {
        &self.head
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn site(&self) -> &SiteMeta {
        &self.site
    }

    /// Token of the fetch whose result would currently be applied.
    pub fn active_token(&self) -> Option<RequestToken> {
        self.active
    }

    /// Mount `route`, returning the fetch it needs, if any.
    ///
    /// Mounting the route that is already mounted changes nothing.
    pub fn mount(&mut self, route: Route) -> Option<Fetch> {
        if self.route.as_ref() == Some(&route) {
            return None;
        }

        self.unmount();
        let head = mem::take(&mut self.head);

        let (head, view, request) = match &route {
            Route::Home => (
                policy::apply_listing(head, &self.site),
                View::Listing(ListingPhase::Loading),
                Some(Request::ListPosts),
            ),
            Route::Post(slug) => (
                policy::clear_detail(head),
                View::Detail {
                    slug: slug.clone(),
                    phase: DetailPhase::Loading,
                },
                Some(Request::Resolve(slug.clone())),
            ),
            Route::Static(page) => (
                policy::apply_static_page(head, page.title(), &self.site),
                View::Static(*page),
                None,
            ),
            Route::Admin => (policy::apply_admin(head, &self.site), View::Admin, None),
            Route::Missing(path) => (
                policy::apply_missing(head, &self.site),
                View::Missing(path.clone()),
                None,
            ),
        };

        self.head = head;
        self.view = view;
        self.route = Some(route.clone());

        request.map(|request| Fetch {
            ticket: self.issue(route),
            request,
        })
    }

    /// Leave the current view, running its cleanup. Any fetch in flight
    /// becomes stale.
    pub fn unmount(&mut self) {
        let head = mem::take(&mut self.head);
        self.head = match &self.view {
            View::Detail { .. } => policy::clear_detail(head),
            View::Static(_) => policy::clear_static_page(head),
            _ => head,
        };
        self.view = View::Blank;
        self.route = None;
        self.active = None;
    }

    /// Apply a finished fetch if it still belongs to the mounted route.
    pub fn complete(&mut self, completion: Completion) -> Applied {
        let Completion { ticket, outcome } = completion;
        if self.active != Some(ticket.token) {
            log!("view"; "discarded stale result for {} ({})", ticket.route, ticket.token);
            return Applied::Stale;
        }
        self.active = None;

        let head = mem::take(&mut self.head);
        let (head, view) = match (&self.view, outcome) {
            (View::Listing(_), Outcome::Posts(Ok(posts))) => {
                (head, View::Listing(ListingPhase::Ready(posts)))
            }
            (View::Listing(_), Outcome::Posts(Err(err))) => {
                log!("error"; "failed to load posts: {err}");
                (
                    policy::apply_failed(head, &self.site),
                    View::Listing(ListingPhase::Failed(err.to_string())),
                )
            }
            (View::Detail { slug, .. }, Outcome::Post(Ok(Some(post)))) => {
                let slug = slug.clone();
                let head = policy::apply_post(head, &post, &self.site);
                let phase = DetailPhase::Displaying(post);
                (head, View::Detail { slug, phase })
            }
            (View::Detail { slug, .. }, Outcome::Post(Ok(None))) => (
                policy::apply_not_found(head, &self.site),
                View::Detail {
                    slug: slug.clone(),
                    phase: DetailPhase::NotFound,
                },
            ),
            (View::Detail { slug, .. }, Outcome::Post(Err(err))) => {
                log!("error"; "failed to resolve {slug}: {err}");
                (
                    policy::apply_failed(head, &self.site),
                    View::Detail {
                        slug: slug.clone(),
                        phase: DetailPhase::Failed(err.to_string()),
                    },
                )
            }
            (_, _) => {
                self.head = head;
                log!("view"; "result for {} does not fit the mounted view", ticket.route);
                return Applied::Stale;
            }
        };

        self.head = head;
        self.view = view;
        Applied::Applied
    }

    /// Mount `route` and run its fetch to completion.
    pub async fn navigate<S: DataSource>(
        &mut self,
        route: Route,
        source: &S,
        resolver: &Resolver,
    ) -> Option<Applied> {
        let fetch = self.mount(route)?;
        let completion = fetch.run(source, resolver).await;
        Some(self.complete(completion))
    }

    fn issue(&mut self, route: Route) -> Ticket {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.active = Some(token);
        Ticket { token, route }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        head::MetaAttr, head::policy::tests::site, post::tests::sample_post,
        resolve::tests::BrokenStore, store::JsonStore,
    };

    fn post_a() -> Post {
        let mut post = sample_post("id-a", Some("post-a"));
        post.title = "Post A".into();
        post.meta_keywords = Some("a, keywords".into());
        post
    }

    fn post_b() -> Post {
        let mut post = sample_post("id-b", Some("post-b"));
        post.title = "Post B".into();
        post
    }

    fn found(fetch: Fetch, post: Post) -> Completion {
        Completion {
            ticket: fetch.ticket,
            outcome: Outcome::Post(Ok(Some(post))),
        }
    }

    #[test]
    fn test_mount_detail_starts_loading_with_fetch() {
        let mut controller = ViewController::new(site());
        let fetch = controller.mount(Route::Post("post-a".into())).unwrap();

        assert_eq!(fetch.request, Request::Resolve("post-a".into()));
        assert!(controller.view().is_loading());
        assert_eq!(controller.active_token(), Some(fetch.ticket.token));
    }

    #[test]
    fn test_remount_same_route_is_noop() {
        let mut controller = ViewController::new(site());
        let fetch = controller.mount(Route::Post("post-a".into())).unwrap();
        assert!(controller.mount(Route::Post("post-a".into())).is_none());
        assert_eq!(controller.active_token(), Some(fetch.ticket.token));
    }

    #[test]
    fn test_display_post_applies_tags() {
        let mut controller = ViewController::new(site());
        let fetch = controller.mount(Route::Post("post-a".into())).unwrap();

        assert_eq!(controller.complete(found(fetch, post_a())), Applied::Applied);
        assert_eq!(controller.head().title(), "Post A | Cricket Hub");
        assert!(controller.head().structured_data().is_some());
        assert_eq!(
            controller.head().meta(MetaAttr::Name, "keywords"),
            Some("a, keywords")
        );
        assert!(matches!(
            controller.view(),
            View::Detail { phase: DetailPhase::Displaying(p), .. } if p.id == "id-a"
        ));
    }

    #[test]
    fn test_cleanup_before_fetch_between_posts() {
        let mut controller = ViewController::new(site());
        let fetch_a = controller.mount(Route::Post("post-a".into())).unwrap();
        controller.complete(found(fetch_a, post_a()));
        assert!(controller.head().structured_data().is_some());

        let fetch_b = controller.mount(Route::Post("post-b".into())).unwrap();

        // B is loading and A's article data is already gone
        assert!(controller.view().is_loading());
        assert!(controller.head().structured_data().is_none());
        assert_eq!(controller.head().meta(MetaAttr::Name, "keywords"), None);

        controller.complete(found(fetch_b, post_b()));
        let data = controller.head().structured_data().unwrap();
        assert_eq!(data["headline"], "Post B");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut controller = ViewController::new(site());
        let fetch_x = controller.mount(Route::Post("post-a".into())).unwrap();
        let fetch_y = controller.mount(Route::Post("post-b".into())).unwrap();
        assert!(fetch_y.ticket.token > fetch_x.ticket.token);

        assert_eq!(controller.complete(found(fetch_y, post_b())), Applied::Applied);
        let head_after_y = controller.head().clone();

        assert_eq!(controller.complete(found(fetch_x, post_a())), Applied::Stale);
        assert_eq!(controller.head(), &head_after_y);
        assert_eq!(controller.head().title(), "Post B | Cricket Hub");
    }

    #[test]
    fn test_stale_result_after_leaving_for_static_page() {
        let mut controller = ViewController::new(site());
        let fetch = controller.mount(Route::Post("post-a".into())).unwrap();
        assert!(controller.mount(Route::Static(StaticPage::About)).is_none());

        assert_eq!(controller.complete(found(fetch, post_a())), Applied::Stale);
        assert!(controller.head().structured_data().is_none());
        assert_eq!(controller.head().title(), "About Us | Cricket Hub");
    }

    #[test]
    fn test_duplicate_completion_is_stale() {
        let mut controller = ViewController::new(site());
        let fetch = controller.mount(Route::Post("post-a".into())).unwrap();
        let again = fetch.clone();

        assert_eq!(controller.complete(found(fetch, post_a())), Applied::Applied);
        assert_eq!(controller.complete(found(again, post_b())), Applied::Stale);
    }

    #[test]
    fn test_not_found_sets_noindex_without_open_graph() {
        let mut controller = ViewController::new(site());
        let home = controller.mount(Route::Home).unwrap();
        controller.complete(Completion {
            ticket: home.ticket,
            outcome: Outcome::Posts(Ok(Vec::new())),
        });
        assert!(controller.head().has_open_graph());

        let fetch = controller.mount(Route::Post("missing".into())).unwrap();
        controller.complete(Completion {
            ticket: fetch.ticket,
            outcome: Outcome::Post(Ok(None)),
        });

        assert_eq!(controller.head().title(), "Post Not Found | Cricket Hub");
        assert_eq!(controller.head().meta(MetaAttr::Name, "robots"), Some("noindex"));
        assert!(!controller.head().has_open_graph());
        assert!(matches!(
            controller.view(),
            View::Detail {
                phase: DetailPhase::NotFound,
                ..
            }
        ));
    }

    #[test]
    fn test_listing_after_admin_drops_noindex() {
        let mut controller = ViewController::new(site());
        assert!(controller.mount(Route::Admin).is_none());
        assert_eq!(
            controller.head().meta(MetaAttr::Name, "robots"),
            Some("noindex, nofollow")
        );

        controller.mount(Route::Home).unwrap();
        assert_eq!(controller.head().meta(MetaAttr::Name, "robots"), None);
    }

    #[test]
    fn test_static_page_unmount_removes_robots() {
        let mut controller = ViewController::new(site());
        controller.mount(Route::Static(StaticPage::Privacy));
        assert_eq!(
            controller.head().meta(MetaAttr::Name, "robots"),
            Some("noindex, follow")
        );

        let fetch = controller.mount(Route::Post("post-a".into())).unwrap();
        assert_eq!(controller.head().meta(MetaAttr::Name, "robots"), None);
        controller.complete(found(fetch, post_a()));
        assert_eq!(controller.head().meta(MetaAttr::Name, "robots"), None);
    }

    #[test]
    fn test_unmount_detail_cleans_article_tags() {
        let mut controller = ViewController::new(site());
        let fetch = controller.mount(Route::Post("post-a".into())).unwrap();
        controller.complete(found(fetch, post_a()));

        controller.unmount();
        assert!(controller.head().structured_data().is_none());
        assert_eq!(controller.head().meta(MetaAttr::Name, "keywords"), None);
        assert_eq!(controller.view(), &View::Blank);
        assert!(controller.route().is_none());
    }

    #[tokio::test]
    async fn test_navigate_resolves_legacy_id() {
        let source = JsonStore::with_posts(vec![post_a()]);
        let mut controller = ViewController::new(site());

        let applied = controller
            .navigate(Route::Post("id-a".into()), &source, &Resolver::default())
            .await;

        assert_eq!(applied, Some(Applied::Applied));
        assert_eq!(
            controller.head().link("canonical"),
            Some("https://crickethub.test/post/post-a")
        );
    }

    #[tokio::test]
    async fn test_navigate_listing_loads_posts() {
        let source = JsonStore::with_posts(vec![post_a(), post_b()]);
        let mut controller = ViewController::new(site());

        controller
            .navigate(Route::Home, &source, &Resolver::default())
            .await;

        assert!(matches!(
            controller.view(),
            View::Listing(ListingPhase::Ready(posts)) if posts.len() == 2
        ));
    }

    #[tokio::test]
    async fn test_navigate_store_failure_is_distinct_state() {
        let mut controller = ViewController::new(site());
        controller
            .navigate(Route::Post("post-a".into()), &BrokenStore, &Resolver::default())
            .await;

        assert!(matches!(
            controller.view(),
            View::Detail {
                phase: DetailPhase::Failed(_),
                ..
            }
        ));
        assert!(!controller.view().is_loading());
        assert_eq!(controller.head().meta(MetaAttr::Name, "robots"), Some("noindex"));
    }

    #[tokio::test]
    async fn test_navigate_listing_failure() {
        let mut controller = ViewController::new(site());
        controller
            .navigate(Route::Home, &BrokenStore, &Resolver::default())
            .await;

        assert!(matches!(
            controller.view(),
            View::Listing(ListingPhase::Failed(_))
        ));
        let head = controller.head();
        assert_eq!(head.title(), "Something Went Wrong | Cricket Hub");
        assert_eq!(head.meta(MetaAttr::Name, "robots"), Some("noindex"));
        assert!(!head.has_open_graph());
        assert!(head.link("canonical").is_none());
        assert!(head.structured_data().is_none());
    }
}
