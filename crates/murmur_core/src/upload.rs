//! Files attached to a create or update.

use crate::MediaKind;
use bytes::Bytes;

/// MIME type inferred from a file name's extension.
///
/// ```
/// use murmur_core::content_type_for_filename;
///
/// assert_eq!(content_type_for_filename("clip.MOV"), "video/quicktime");
/// assert_eq!(content_type_for_filename("notes"), "application/octet-stream");
/// ```
pub fn content_type_for_filename(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct UploadFile {
    filename: String,
    content_type: String,
    bytes: Bytes,
}

impl UploadFile {
    /// Create an upload, inferring the content type from the file name.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let filename = filename.into();
        let content_type = content_type_for_filename(&filename).to_string();
        Self {
            filename,
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Create an upload with an explicit content type.
    pub fn with_content_type(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Video uploads go in the `video` part; everything else is an image.
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_content_type(&self.content_type).unwrap_or(MediaKind::Image)
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-byte file.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
