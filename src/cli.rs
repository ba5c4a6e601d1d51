//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cricket Hub blog server CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Post collection file (relative to project root)
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    /// Config file name (default: cricket-hub.toml)
    #[arg(short = 'C', long, default_value = "cricket-hub.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Admin credentials for commands that modify the post collection
#[derive(clap::Args, Debug, Clone)]
pub struct AuthArgs {
    /// Admin account email
    #[arg(long)]
    pub email: String,

    /// Admin account password
    #[arg(long)]
    pub password: String,
}

/// Post fields accepted by `post add` and `post update`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PostArgs {
    /// Post title
    #[arg(long)]
    pub title: Option<String>,

    /// URL slug (derived from the title when omitted on add)
    #[arg(long)]
    pub slug: Option<String>,

    /// Short summary shown on the listing
    #[arg(long)]
    pub excerpt: Option<String>,

    /// SEO description overriding the excerpt
    #[arg(long = "meta-description")]
    pub meta_description: Option<String>,

    /// Comma separated SEO keywords
    #[arg(long = "meta-keywords")]
    pub meta_keywords: Option<String>,

    /// Cover image URL
    #[arg(long = "image-url")]
    pub image_url: Option<String>,

    /// Author name
    #[arg(long)]
    pub author: Option<String>,

    /// File holding the rendered HTML body
    #[arg(long = "content-file")]
    pub content_file: Option<PathBuf>,
}

/// Post collection management
#[derive(Subcommand, Debug, Clone)]
pub enum PostCommands {
    /// List posts, newest first
    List,

    /// Show a post by slug or id
    Show {
        /// slug or legacy id
        ident: String,
    },

    /// Create a new post
    Add {
        #[command(flatten)]
        auth: AuthArgs,

        #[command(flatten)]
        post: PostArgs,
    },

    /// Update fields of an existing post
    Update {
        /// id of the post to update
        id: String,

        #[command(flatten)]
        auth: AuthArgs,

        #[command(flatten)]
        post: PostArgs,
    },

    /// Delete a post permanently
    Delete {
        /// id of the post to delete
        id: String,

        #[command(flatten)]
        auth: AuthArgs,
    },
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a site with default config and an empty post collection
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Serve the blog over HTTP
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// Override base URL used for canonical and Open Graph links
        #[arg(long = "base-url")]
        base_url: Option<String>,
    },

    /// Navigate the site interactively in the terminal
    Browse,

    /// Print the head tags a route would produce
    Head {
        /// route path, e.g. `/post/ashes-2024`
        path: String,
    },

    /// Manage posts
    Post {
        #[command(subcommand)]
        command: PostCommands,
    },

    /// Print the argon2 PHC string to put in `[admin].password_hash`
    HashPassword {
        /// the password to hash
        password: String,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
    pub const fn needs_config(&self) -> bool {
        !matches!(
            self.command,
            Commands::Init { .. } | Commands::HashPassword { .. }
        )
    }
}
