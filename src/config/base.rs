//! `[base]` section configuration.
//!
//! Site identity used by the head policy: names, descriptions, social image
//! and the publisher logo embedded in article structured data.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in cricket-hub.toml - site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Cricket Hub"
/// url = "https://crickethub.co.in"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site name, used as the title suffix and publisher name.
    #[serde(default = "defaults::base::title")]
    #[educe(Default = defaults::base::title())]
    pub title: String,

    /// Document title of the listing page.
    #[serde(default = "defaults::base::headline")]
    #[educe(Default = defaults::base::headline())]
    pub headline: String,

    /// Meta description of the listing page.
    #[serde(default = "defaults::base::description")]
    #[educe(Default = defaults::base::description())]
    pub description: String,

    /// Shorter description used for `og:description` on the listing.
    #[serde(default = "defaults::base::summary")]
    #[educe(Default = defaults::base::summary())]
    pub summary: String,

    /// Public origin for canonical and Open Graph URLs.
    /// Filled from the bind address when serving without one.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// Default social image for site-level pages.
    #[serde(default = "defaults::base::image")]
    #[educe(Default = defaults::base::image())]
    pub image: String,

    /// Publisher logo in article structured data.
    #[serde(default = "defaults::base::logo")]
    #[educe(Default = defaults::base::logo())]
    pub logo: String,

    /// Contact address shown on the contact page.
    #[serde(default = "defaults::base::email")]
    #[educe(Default = defaults::base::email())]
    pub email: String,

    /// BCP 47 language code for the `<html lang>` attribute.
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,
}

impl BaseConfig {
    /// Origin without a trailing slash, empty when unknown.
    pub fn origin(&self) -> &str {
        self.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }
}
