//! References to external media files.

use std::path::Path;

use crate::{MetaObject, Metadata, MetadataMut};

const MIME_TYPES: &[(&str, &str)] = &[
    ("wav", "audio/wav"),
    ("mp3", "audio/mpeg"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
    ("aif", "audio/aiff"),
    ("aiff", "audio/aiff"),
    ("mp4", "video/mp4"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
];

/// Mime type used when the extension is unknown.
pub const DEFAULT_MIME: &str = "audio/wav";

/// A media file an annotation set refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    url: String,
    mime: String,
    metadata: Metadata,
}

impl Media {
    /// Without a mime type, one is guessed from the url's extension.
    pub fn new(url: impl Into<String>, mime: Option<&str>) -> Self {
        let url = url.into();
        let mime = match mime {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => guess_mime(&url).to_string(),
        };
        Self {
            url,
            mime,
            metadata: Metadata::new(),
        }
    }

    /// Builder-style: set the metadata, identifier included.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }
}

impl MetaObject for Media {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> MetadataMut<'_> {
        MetadataMut::new(&mut self.metadata)
    }
}

fn guess_mime(url: &str) -> &'static str {
    let ext = Path::new(url)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    ext.and_then(|ext| {
        MIME_TYPES
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, mime)| *mime)
    })
    .unwrap_or(DEFAULT_MIME)
}
