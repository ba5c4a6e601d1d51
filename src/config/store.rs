//! `[store]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[store]` section in cricket-hub.toml - where the post collection lives.
///
/// # Example
/// ```toml
/// [store]
/// path = "data/posts.json"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// JSON document collection, relative to the site root.
    #[serde(default = "defaults::store::path")]
    #[educe(Default = defaults::store::path())]
    pub path: PathBuf,
}
