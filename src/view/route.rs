//! Route table.

use std::fmt;

/// Informational pages with fixed bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticPage {
    About,
    Contact,
    Privacy,
}

impl StaticPage {
    pub const fn title(self) -> &'static str {
        match self {
            Self::About => "About Us",
            Self::Contact => "Contact Us",
            Self::Privacy => "Privacy Policy",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::About => "/about",
            Self::Contact => "/contact",
            Self::Privacy => "/privacy",
        }
    }
}

/// A resolved location in the site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/` article listing
    Home,
    /// `/post/:slug`, where the slug may be a legacy document id
    Post(String),
    Static(StaticPage),
    /// `/admin` hidden login
    Admin,
    /// Anything else
    Missing(String),
}

impl Route {
    /// Match a decoded request path. Query strings and fragments are ignored,
    /// as are trailing slashes.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Self::Home,
            "/about" => Self::Static(StaticPage::About),
            "/contact" => Self::Static(StaticPage::Contact),
            "/privacy" => Self::Static(StaticPage::Privacy),
            "/admin" => Self::Admin,
            _ => match trimmed.strip_prefix("/post/") {
                Some(slug) if !slug.is_empty() && !slug.contains('/') => {
                    Self::Post(slug.to_owned())
                }
                _ => Self::Missing(path.to_owned()),
            },
        }
    }

    /// Path that routes back to this route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Post(slug) => format!("/post/{slug}"),
            Self::Static(page) => page.path().to_owned(),
            Self::Admin => "/admin".to_owned(),
            Self::Missing(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_home() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/?utm_source=x"), Route::Home);
    }

    #[test]
    fn test_parse_post() {
        assert_eq!(
            Route::parse("/post/ashes-2024"),
            Route::Post("ashes-2024".into())
        );
        assert_eq!(
            Route::parse("/post/ashes-2024/?ref=feed"),
            Route::Post("ashes-2024".into())
        );
    }

    #[test]
    fn test_parse_post_without_slug_is_missing() {
        assert_eq!(Route::parse("/post/"), Route::Missing("/post/".into()));
        assert!(matches!(Route::parse("/post/a/b"), Route::Missing(_)));
    }

    #[test]
    fn test_parse_static_and_admin() {
        assert_eq!(Route::parse("/about"), Route::Static(StaticPage::About));
        assert_eq!(Route::parse("/contact/"), Route::Static(StaticPage::Contact));
        assert_eq!(Route::parse("/privacy"), Route::Static(StaticPage::Privacy));
        assert_eq!(Route::parse("/admin"), Route::Admin);
    }

    #[test]
    fn test_parse_missing() {
        assert_eq!(Route::parse("/feed.xml"), Route::Missing("/feed.xml".into()));
    }

    #[test]
    fn test_path_round_trip() {
        for path in ["/", "/post/abc123", "/about", "/contact", "/privacy", "/admin"] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }
}
