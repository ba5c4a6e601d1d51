//! Cricket Hub - a cricket blog server with route-driven SEO head sync.

mod admin;
mod browse;
mod cli;
mod config;
mod head;
mod init;
mod logger;
mod manage;
mod post;
mod render;
mod resolve;
mod serve;
mod store;
mod utils;
mod view;

use admin::{ConfigIdentity, hash_password};
use anyhow::{Context, Result, bail};
use browse::browse_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::{SiteConfig, cfg, init_config};
use head::{policy::SiteMeta, render_head_lines};
use init::new_site;
use resolve::Resolver;
use serve::serve_site;
use std::{path::Path, sync::Arc};
use store::JsonStore;
use tokio::runtime::Runtime;
use view::{Route, ViewController};

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    if let Commands::HashPassword { password } = &cli.command {
        println!("{}", hash_password(password)?);
        return Ok(());
    }

    init_config(load_config(cli)?);
    let c = cfg();

    if let Commands::Init { name } = &cli.command {
        return new_site(&c, name.is_some());
    }

    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let source = Arc::new(
        JsonStore::open(&c.store.path)
            .with_context(|| format!("Failed to open {}", c.store.path.display()))?,
    );

    match &cli.command {
        Commands::Serve { .. } => serve_site(runtime.handle(), source),
        Commands::Browse => browse_site(&runtime, source, ConfigIdentity::from_config(&c)),
        Commands::Head { path } => print_head(&runtime, &c, source.as_ref(), path),
        Commands::Post { command } => runtime.block_on(manage::run(
            command,
            source.as_ref(),
            &ConfigIdentity::from_config(&c),
        )),
        Commands::Init { .. } | Commands::HashPassword { .. } => Ok(()),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    // Validate config state based on command
    let config_exists = config.config_path.exists();
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) if cli.needs_config() => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}

/// Print the head a route settles on, one element per line.
fn print_head(
    runtime: &Runtime,
    config: &SiteConfig,
    source: &JsonStore,
    path: &str,
) -> Result<()> {
    let mut controller = ViewController::new(SiteMeta::from_config(config));
    runtime.block_on(controller.navigate(Route::parse(path), source, &Resolver::default()));

    for line in render_head_lines(controller.head())? {
        println!("{line}");
    }
    Ok(())
}
