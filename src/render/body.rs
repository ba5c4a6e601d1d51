//! HTML fragments for each view.
//!
//! Post fields are escaped; `Post::content` is trusted admin-authored HTML
//! and is inserted as-is.

use crate::{
    head::policy::SiteMeta,
    post::Post,
    utils::escape::escape_html,
    view::{DetailPhase, ListingPhase, StaticPage, View},
};
use chrono::{DateTime, Local};

/// A post is followed by an in-feed ad every this many cards.
const FEED_AD_EVERY: usize = 3;

/// Values shared by every page body.
pub struct Chrome<'a> {
    pub site: &'a SiteMeta,
    /// Contact address shown on the contact page
    pub email: &'a str,
    /// Path of the mounted route, for the active nav link
    pub current: &'a str,
    pub today: DateTime<Local>,
}

// ============================================================================
// Layout
// ============================================================================

pub fn header(chrome: &Chrome) -> String {
    let nav = [("/", "Home"), ("/about", "About")]
        .iter()
        .map(|(href, label)| {
            let current = if *href == chrome.current {
                r#" aria-current="page""#
            } else {
                ""
            };
            format!(r#"<a href="{href}"{current}>{label}</a>"#)
        })
        .collect::<String>();

    format!(
        r#"<header class="site-header"><div class="inner"><a class="brand" href="/">{name}</a><nav>{nav}</nav></div></header>"#,
        name = escape_html(&chrome.site.name),
    )
}

pub fn footer(chrome: &Chrome) -> String {
    let links = [StaticPage::About, StaticPage::Contact, StaticPage::Privacy]
        .iter()
        .map(|page| format!(r#"<a href="{}">{}</a>"#, page.path(), page.title()))
        .collect::<String>();

    format!(
        r#"<footer class="site-footer"><div class="inner"><nav>{links}</nav><p>&copy; {year} {name}. All rights reserved.</p></div></footer>"#,
        year = chrome.today.format("%Y"),
        name = escape_html(&chrome.site.name),
    )
}

fn ad_placeholder(label: &str) -> String {
    format!(r#"<div class="ad-placeholder" aria-hidden="true"><span>{label}</span></div>"#)
}

fn loading() -> String {
    r#"<div class="centered" role="status">Loading...</div>"#.to_owned()
}

/// Human date for a post timestamp, e.g. `June 1, 2024`.
pub fn display_date(date: &str) -> String {
    DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| date.get(..10).unwrap_or(date).to_owned())
}

// ============================================================================
// Views
// ============================================================================

pub fn view(view: &View, chrome: &Chrome) -> String {
    match view {
        View::Blank => String::new(),
        View::Listing(ListingPhase::Loading) => loading(),
        View::Listing(ListingPhase::Ready(posts)) => listing(posts),
        View::Listing(ListingPhase::Failed(_)) => failed(),
        View::Detail { phase, .. } => match phase {
            DetailPhase::Loading => loading(),
            DetailPhase::Displaying(post) => article(post),
            DetailPhase::NotFound => not_found("Post not found"),
            DetailPhase::Failed(_) => failed(),
        },
        View::Static(page) => static_page(*page, chrome),
        View::Admin => admin_login(),
        View::Missing(_) => not_found("Page not found"),
    }
}

fn listing(posts: &[Post]) -> String {
    let mut cards = String::new();
    for (index, post) in posts.iter().enumerate() {
        cards.push_str(&post_card(post));

        let shown = index + 1;
        if shown % FEED_AD_EVERY == 0 && shown < posts.len() {
            cards.push_str(&format!(
                r#"<div class="feed-ad">{}</div>"#,
                ad_placeholder(&format!("In-feed Ad #{}", shown / FEED_AD_EVERY))
            ));
        }
    }

    format!(
        r#"{banner}<h1 class="centered">Latest Articles</h1><div class="grid">{cards}</div>"#,
        banner = ad_placeholder("Homepage Top Banner"),
    )
}

fn post_card(post: &Post) -> String {
    let title = escape_html(&post.title);
    format!(
        r#"<div class="card"><a href="/post/{key}"><img src="{image}" alt="{title}"><div class="body"><h2>{title}</h2><p class="byline">By {author} on {date}</p><p>{excerpt}</p></div></a></div>"#,
        key = urlencoding::encode(post.route_key()),
        image = escape_html(&post.image_url),
        author = escape_html(&post.author),
        date = display_date(&post.date),
        excerpt = escape_html(&post.excerpt),
    )
}

fn article(post: &Post) -> String {
    let title = escape_html(&post.title);
    format!(
        concat!(
            r#"<article class="panel"><img class="hero" src="{image}" alt="{title}">"#,
            r#"<h1>{title}</h1><p class="byline">By <strong>{author}</strong> on {date}</p>"#,
            r#"{top}<div class="content">{content}</div>{bottom}"#,
            r#"<p><a href="/">&larr; Back to all articles</a></p></article>"#,
        ),
        title = title,
        image = escape_html(&post.image_url),
        author = escape_html(&post.author),
        date = display_date(&post.date),
        top = ad_placeholder("Article Top Banner"),
        content = post.content,
        bottom = ad_placeholder("Article Bottom Banner"),
    )
}

fn not_found(message: &str) -> String {
    format!(r#"<div class="centered"><h2>{message}</h2><a href="/">Back to Home</a></div>"#)
}

fn failed() -> String {
    r#"<div class="centered"><h2>Something went wrong</h2><p>The articles could not be loaded right now. Please try again later.</p><a href="/">Back to Home</a></div>"#.to_owned()
}

/// Sign-in form, hidden until the keystroke gate opens.
fn admin_login() -> String {
    concat!(
        r#"<div class="panel" id="admin-login" hidden><h1>Admin Login</h1>"#,
        r#"<form><p><label>Email <input type="email" name="email" required></label></p>"#,
        r#"<p><label>Password <input type="password" name="password" required></label></p>"#,
        r#"<p><button type="submit">Sign in</button></p></form></div>"#,
    )
    .to_owned()
}

fn static_page(page: StaticPage, chrome: &Chrome) -> String {
    let name = escape_html(&chrome.site.name);
    let paragraphs = match page {
        StaticPage::About => vec![
            format!(
                "Welcome to {name}, your number one source for all things cricket. We're dedicated to giving you the very best of cricket news, with a focus on in-depth analysis, player statistics, and behind-the-scenes stories."
            ),
            format!(
                "Founded in {year} by a passionate cricket fan, {name} has come a long way from its beginnings. When we first started out, our passion for the sport drove us to start our own blog.",
                year = chrome.today.format("%Y"),
            ),
            "We hope you enjoy our articles as much as we enjoy offering them to you. If you have any questions or comments, please don't hesitate to contact us.".to_owned(),
            "Sincerely,".to_owned(),
            format!("The {name} Team"),
        ],
        StaticPage::Contact => {
            let email = escape_html(chrome.email);
            vec![
                "We'd love to hear from you! Whether you have a question, a suggestion, or just want to talk about cricket, feel free to reach out.".to_owned(),
                format!(r#"You can contact us via email at: <a href="mailto:{email}">{email}</a>"#),
                "You can also follow us on our social media channels to stay updated with the latest content.".to_owned(),
            ]
        }
        StaticPage::Privacy => {
            let origin = escape_html(&chrome.site.origin);
            vec![
                format!(
                    "Your privacy is important to us. It is {name}'s policy to respect your privacy regarding any information we may collect from you across our website, {origin}, and other sites we own and operate."
                ),
                "We only ask for personal information when we truly need it to provide a service to you. We collect it by fair and lawful means, with your knowledge and consent. We also let you know why we're collecting it and how it will be used.".to_owned(),
                "We only retain collected information for as long as necessary to provide you with your requested service. What data we store, we'll protect within commercially acceptable means to prevent loss and theft, as well as unauthorized access, disclosure, copying, use or modification.".to_owned(),
                "We don't share any personally identifying information publicly or with third-parties, except when required to by law.".to_owned(),
                "Our website may link to external sites that are not operated by us. Please be aware that we have no control over the content and practices of these sites, and cannot accept responsibility or liability for their respective privacy policies.".to_owned(),
                "Your continued use of our website will be regarded as acceptance of our practices around privacy and personal information. If you have any questions about how we handle user data and personal information, feel free to contact us.".to_owned(),
                format!(
                    "This policy is effective as of {}.",
                    chrome.today.format("%B %-d, %Y")
                ),
            ]
        }
    };

    let body = paragraphs
        .iter()
        .map(|p| format!("<p>{p}</p>"))
        .collect::<String>();
    format!(
        r#"<div class="panel"><h1>{title}</h1><div class="content">{body}</div></div>"#,
        title = page.title(),
    )
}
