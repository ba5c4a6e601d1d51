//! Site initialization module.
//!
//! Creates a new site with a default configuration and an empty post
//! collection.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore"];

/// Leftovers of interrupted store writes
const IGNORED_PATTERNS: &[&str] = &["*.json.tmp"];

/// Create a new site at the config's root.
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // If no name was provided (init in current dir), the directory must be
    // completely empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `cricket-hub init <SITE_NAME>` to create in a subdirectory."
        );
    }

    fs::create_dir_all(root).with_context(|| format!("Failed to create {}", root.display()))?;
    init_default_config(&config.config_path)?;
    init_store(&config.store.path)?;
    init_ignored_files(root, IGNORED_PATTERNS)?;

    log!("init"; "created site at {}", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write default configuration file
fn init_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write an empty post collection
fn init_store(path: &Path) -> Result<()> {
    if path.exists() {
        bail!(
            "Path `{}` already exists. Try `cricket-hub init <SITE_NAME>` instead.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, "[]\n").with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Initialize ignore files with the given patterns
fn init_ignored_files(root: &Path, patterns: &[&str]) -> Result<()> {
    let content = patterns.join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use tempfile::TempDir;

    fn config_for(dir: &Path, name: Option<&str>) -> SiteConfig {
        let root = dir.to_string_lossy().into_owned();
        let mut args = vec!["cricket-hub", "--root", root.as_str(), "init"];
        if let Some(name) = name {
            args.push(name);
        }
        let cli: &'static Cli = Box::leak(Box::new(Cli::parse_from(args)));
        let mut config = SiteConfig::default();
        config.update_with_cli(cli);
        config
    }

    #[test]
    fn test_new_site_in_subdirectory() {
        let dir = TempDir::new().unwrap();
        let config = config_for(dir.path(), Some("blog"));
        new_site(&config, true).unwrap();

        let root = dir.path().join("blog");
        let written = SiteConfig::from_path(&root.join("cricket-hub.toml")).unwrap();
        assert_eq!(written.base.title, "Cricket Hub");
        assert_eq!(fs::read_to_string(root.join("posts.json")).unwrap(), "[]\n");
        assert!(root.join(".gitignore").exists());
    }

    #[test]
    fn test_new_site_requires_empty_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let config = config_for(dir.path(), None);
        assert!(new_site(&config, false).is_err());
    }
}
