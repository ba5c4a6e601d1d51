//! Site configuration management for `cricket-hub.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[base]`    | Site identity (title, descriptions, url, images) |
//! | `[store]`   | Post collection file                             |
//! | `[serve]`   | HTTP server (interface, port)                    |
//! | `[admin]`   | Keystroke gate and admin account                 |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Cricket Hub"
//! url = "https://crickethub.co.in"
//!
//! [store]
//! path = "posts.json"
//!
//! [serve]
//! port = 5280
//!
//! [admin]
//! email = "editor@crickethub.co.in"
//! password_hash = "..."
//! ```

mod admin;
mod base;
pub mod defaults;
mod error;
mod handle;
mod serve;
mod store;

pub use handle::{cfg, init_config};

use admin::AdminConfig;
use base::BaseConfig;
use error::ConfigError;
use serve::ServeConfig;
use store::StoreConfig;

use crate::{
    admin::is_password_hash,
    cli::{Cli, Commands},
};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing cricket-hub.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Absolute site root (set after loading)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site identity
    #[serde(default)]
    pub base: BaseConfig,

    /// Post collection
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Admin gate and account
    #[serde(default)]
    pub admin: AdminConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let base = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };
        self.root = Self::normalize_path(&root);
        self.config_path = Self::normalize_path(&self.root.join(&cli.config));

        Self::update_option(&mut self.store.path, cli.store.as_ref());
        self.store.path = Self::normalize_path(&self.root.join(&self.store.path));

        if let Commands::Serve {
            interface,
            port,
            base_url,
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
            if base_url.is_some() {
                self.base.url = base_url.clone();
            }
        }

        // Canonical links need an origin even when serving locally
        if self.base.url.is_none() {
            self.base.url = Some(format!(
                "http://{}:{}",
                self.serve.interface, self.serve.port
            ));
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        if self.admin.sequence.is_empty() {
            bail!(ConfigError::Admin {
                field: "sequence",
                reason: "must not be empty".into(),
            });
        }

        let sequence_len = self.admin.sequence.chars().count();
        if self.admin.window < sequence_len {
            bail!(ConfigError::Admin {
                field: "window",
                reason: format!("must be at least {sequence_len} to hold the sequence"),
            });
        }

        let hash = self.admin.password_hash.trim();
        if !hash.is_empty() && !is_password_hash(hash) {
            bail!(ConfigError::Admin {
                field: "password_hash",
                reason: "must be a PHC string from `cricket-hub hash-password`".into(),
            });
        }

        if hash.is_empty() != self.admin.email.trim().is_empty() {
            bail!(ConfigError::Admin {
                field: "email",
                reason: "email and password_hash must be set together".into(),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
