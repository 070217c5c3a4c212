//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Murmur - authenticated media access for the Murmur social feed
#[derive(Parser, Debug)]
#[command(name = "murmur")]
#[command(about = "List and edit posts and fetch protected media from a Murmur service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the layered murmur.toml lookup)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Post commands
    #[command(subcommand)]
    Posts(PostCommands),

    /// Media commands
    #[command(subcommand)]
    Media(MediaCommands),
}

/// Post subcommands
#[derive(Subcommand, Debug)]
pub enum PostCommands {
    /// List posts
    List {
        /// Only posts by this user
        #[arg(long)]
        user: Option<String>,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Publish a post
    Create {
        /// Post text
        #[arg(long, default_value = "")]
        content: String,

        /// Image or video to attach (repeatable)
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },

    /// Replace a post's text and append media
    Update {
        /// Post to update
        id: String,

        /// New post text
        #[arg(long, default_value = "")]
        content: String,

        /// Image or video to attach (repeatable)
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },

    /// Delete a post
    Delete {
        /// Post to delete
        id: String,
    },
}

/// Media subcommands
#[derive(Subcommand, Debug)]
pub enum MediaCommands {
    /// Resolve a media reference (id, path or URL)
    Fetch {
        /// Media reference as declared on a post
        reference: String,

        /// Write fetched bytes to this file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Treat the reference as a video and apply video reloads
        #[arg(long)]
        video: bool,
    },
}
