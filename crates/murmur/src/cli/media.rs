//! Media command handlers.

use super::commands::MediaCommands;
use murmur::{
    MediaError, MediaErrorKind, MediaReference, MediaResolver, Murmur, MurmurResult,
    ResourceHandle, VideoLoader, VideoState,
};
use std::path::Path;

/// Handle media commands.
pub async fn handle_media_command(murmur: &Murmur, cmd: MediaCommands) -> MurmurResult<()> {
    match cmd {
        MediaCommands::Fetch {
            reference,
            out,
            video,
        } => {
            // The resolver owns the handle until the bytes are written out.
            let resolver = murmur.resolver();
            let handle = if video {
                fetch_video(murmur, &resolver, &reference).await
            } else {
                resolver.resolve(&MediaReference::image(reference.as_str())).await
            };
            let result = report(murmur, &reference, &handle, out.as_deref()).await;
            resolver.lifecycle().release_all();
            result
        }
    }
}

async fn fetch_video(murmur: &Murmur, resolver: &MediaResolver, reference: &str) -> ResourceHandle {
    let loader = VideoLoader::new(resolver.clone(), murmur.config().media());
    let playback = loader.load(&MediaReference::video(reference)).await;
    match playback.state() {
        VideoState::Ready { handle } => handle.clone(),
        VideoState::FailedTerminal {
            fallback_url: Some(url),
        } => ResourceHandle::Direct { url: url.clone() },
        _ => ResourceHandle::Unavailable,
    }
}

async fn report(
    murmur: &Murmur,
    reference: &str,
    handle: &ResourceHandle,
    out: Option<&Path>,
) -> MurmurResult<()> {
    match handle {
        ResourceHandle::Local(local) => {
            match out {
                Some(path) => {
                    let written = murmur.save_media(local, path).await?;
                    println!(
                        "Wrote {} bytes ({}) to {}",
                        written,
                        local.content_type(),
                        path.display()
                    );
                }
                None => println!("{} ({}, {} bytes)", local.url(), local.content_type(), local.size()),
            }
            Ok(())
        }
        ResourceHandle::Direct { url } => {
            println!("Authenticated fetch failed; open directly: {}", url);
            Ok(())
        }
        ResourceHandle::Unavailable => {
            Err(MediaError::new(MediaErrorKind::UnusableReference(reference.to_string())).into())
        }
    }
}
