//! Post command handlers.

use super::commands::PostCommands;
use murmur::{DecodeError, Murmur, MurmurResult, Post, UploadFile, ValidationError};
use std::path::PathBuf;
use tracing::debug;

/// Handle post commands.
pub async fn handle_post_command(murmur: &Murmur, cmd: PostCommands) -> MurmurResult<()> {
    match cmd {
        PostCommands::List { user, json } => {
            let posts = match user {
                Some(user) => murmur.posts().list_for_user(&user).await?,
                None => murmur.posts().list().await?,
            };
            print_posts(&posts, json)
        }

        PostCommands::Create { content, files } => {
            let files = read_files(&files).await?;
            let post = murmur.posts().create(&content, files).await?;
            println!("Created post {}", post.id());
            Ok(())
        }

        PostCommands::Update { id, content, files } => {
            let files = read_files(&files).await?;
            let post = murmur.posts().update(&id, &content, files).await?;
            println!("Updated post {}", post.id());
            Ok(())
        }

        PostCommands::Delete { id } => {
            murmur.posts().delete(&id).await?;
            println!("Deleted post {}", id);
            Ok(())
        }
    }
}

async fn read_files(paths: &[PathBuf]) -> MurmurResult<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ValidationError::new(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(file = %filename, size = bytes.len(), "Attaching file");
        files.push(UploadFile::new(filename, bytes));
    }
    Ok(files)
}

fn print_posts(posts: &[Post], json: bool) -> MurmurResult<()> {
    if json {
        let rendered = serde_json::to_string_pretty(posts)
            .map_err(|e| DecodeError::new(format!("Failed to render posts: {}", e)))?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("{:-<80}", "");
    for post in posts {
        let author = post.user_name().as_deref().unwrap_or(post.user_id());
        let when = post
            .created_at()
            .as_ref()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{}  {}  {}", post.id(), author, when);
        println!("{}", post.content());
        let media = post.media_references();
        if !media.is_empty() {
            println!("media: {}", media.len());
        }
        println!("likes: {}  comments: {}", post.likes(), post.comment_count());
        println!("{:-<80}", "");
    }
    println!("Total: {} posts", posts.len());
    Ok(())
}
