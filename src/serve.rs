//! Blog HTTP server.
//!
//! Built on `tiny_http`. Each request mounts its route on a fresh
//! [`ViewController`], runs the route's fetch to completion and answers with
//! the rendered page, so the head a crawler sees is exactly what the view
//! policy produces for that route.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐      block_on       ┌──────────────────┐
//! │   Main Thread   │ ──────────────────▶ │  tokio runtime   │
//! │  (HTTP Server)  │ ◀────────────────── │  (store fetches) │
//! └────────┬────────┘     Completion      └──────────────────┘
//!          │
//!          ▼
//!   route → controller → render_page → Response (200 / 404 / 503)
//! ```

use crate::{
    config::{SiteConfig, cfg},
    head::policy::SiteMeta,
    log,
    render::{Page, render_page},
    resolve::Resolver,
    store::DataSource,
    view::{Route, ViewController},
};
use anyhow::{Context, Result, anyhow};
use std::{io::Cursor, net::SocketAddr, sync::Arc};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tokio::runtime::Handle;

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the server and block until Ctrl+C.
///
/// Binds to the configured interface and port, moving to the next port when
/// one is taken.
pub fn serve_site<S: DataSource>(runtime: &Handle, source: Arc<S>) -> Result<()> {
    let c = cfg();
    let interface: std::net::IpAddr = c
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", c.serve.interface))?;

    let (server, addr) = try_bind_port(interface, c.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    let resolver = Resolver::default();
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &cfg(), runtime, source.as_ref(), &resolver) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

fn handle_request<S: DataSource>(
    request: Request,
    config: &SiteConfig,
    runtime: &Handle,
    source: &S,
    resolver: &Resolver,
) -> Result<()> {
    if !matches!(request.method(), Method::Get | Method::Head) {
        return respond_text(request, 405, "405 Method Not Allowed");
    }

    let route = route_for(request.url());
    let page = runtime.block_on(render_route(route.clone(), config, source, resolver))?;

    log!("serve"; "{} {} {}", request.method(), route, page.status);
    respond_html(request, page)
}

/// Decode a request URL into a route.
fn route_for(url: &str) -> Route {
    // Decode URL-encoded characters (e.g., %20 → space)
    let url_path = urlencoding::decode(url)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| url.to_owned());
    Route::parse(&url_path)
}

/// Mount `route` on a fresh controller and render the settled page.
pub async fn render_route<S: DataSource>(
    route: Route,
    config: &SiteConfig,
    source: &S,
    resolver: &Resolver,
) -> Result<Page> {
    let mut controller = ViewController::new(SiteMeta::from_config(config));
    controller.navigate(route, source, resolver).await;
    render_page(&controller, config)
}

// ============================================================================
// Response Helpers
// ============================================================================

fn content_type(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("invalid header `{value}`"))
}

fn respond_html(request: Request, page: Page) -> Result<()> {
    let response = Response::from_string(page.html)
        .with_status_code(StatusCode(page.status))
        .with_header(content_type("text/html; charset=utf-8")?);
    request.respond(response)?;
    Ok(())
}

fn respond_text(request: Request, status: u16, body: &'static str) -> Result<()> {
    let response = Response::new(
        StatusCode(status),
        vec![content_type("text/plain")?],
        Cursor::new(body),
        Some(body.len()),
        None,
    );
    request.respond(response)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        post::tests::sample_post, resolve::tests::BrokenStore, store::JsonStore,
        view::StaticPage,
    };

    #[test]
    fn test_route_for_decodes_and_strips_query() {
        assert_eq!(route_for("/post/ashes%202024?x=1"), Route::Post("ashes 2024".into()));
        assert_eq!(route_for("/about"), Route::Static(StaticPage::About));
    }

    #[tokio::test]
    async fn test_render_route_statuses() {
        let config = SiteConfig::default();
        let resolver = Resolver::default();
        let source = JsonStore::with_posts(vec![sample_post("abc123", Some("ashes-2024"))]);

        let found = render_route(Route::parse("/post/abc123"), &config, &source, &resolver)
            .await
            .unwrap();
        assert_eq!(found.status, 200);

        let missing = render_route(Route::parse("/post/zzz"), &config, &source, &resolver)
            .await
            .unwrap();
        assert_eq!(missing.status, 404);

        let failed = render_route(Route::Home, &config, &BrokenStore, &resolver)
            .await
            .unwrap();
        assert_eq!(failed.status, 503);
    }
}
