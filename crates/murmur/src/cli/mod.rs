//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the murmur binary.

mod commands;
mod media;
mod posts;

pub use commands::{Cli, Commands};
pub use media::handle_media_command;
pub use posts::handle_post_command;
