//! Document Holder
//!
//! The uploaded contract as an opaque binary payload with a declared media type.
//! Nothing here looks inside the bytes; the collaborator does all reading.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Media type assumed when none is declared and none can be inferred.
pub const DEFAULT_MEDIA_TYPE: &str = "application/pdf";

const WORD_DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Coarse classification of a document's media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Word,
    Text,
    Other,
}

impl DocumentKind {
    /// Classify a media type string.
    pub fn from_media_type(media_type: &str) -> Self {
        let media_type = media_type.to_ascii_lowercase();
        if media_type == "application/pdf" {
            DocumentKind::Pdf
        } else if media_type.contains("word") || media_type.contains("officedocument") {
            DocumentKind::Word
        } else if media_type.starts_with("text/") {
            DocumentKind::Text
        } else {
            DocumentKind::Other
        }
    }
}

/// Map a file extension (without the dot) to a media type.
pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "md" | "markdown" => Some("text/markdown"),
        "txt" => Some("text/plain"),
        "doc" => Some("application/msword"),
        "docx" => Some(WORD_DOCX_MEDIA_TYPE),
        _ => None,
    }
}

/// An immutable contract document.
///
/// Cloning is cheap: the payload is reference-counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    content: Bytes,
    media_type: String,
    name: String,
}

impl Document {
    /// Create a document from raw bytes.
    ///
    /// A blank media type falls back to [`DEFAULT_MEDIA_TYPE`]. Empty content is rejected.
    pub fn new(
        content: impl Into<Bytes>,
        media_type: impl Into<String>,
        name: impl Into<String>,
    ) -> CoreResult<Self> {
        let content = content.into();
        let name = name.into();
        if content.is_empty() {
            return Err(CoreError::validation(format!("document '{}' is empty", name)));
        }

        let media_type = media_type.into();
        let media_type = if media_type.trim().is_empty() {
            DEFAULT_MEDIA_TYPE.to_string()
        } else {
            media_type.trim().to_string()
        };

        Ok(Self {
            content,
            media_type,
            name,
        })
    }

    /// Read a document from disk, inferring the media type from its extension.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read(path)?;
        let media_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(media_type_for_extension)
            .unwrap_or(DEFAULT_MEDIA_TYPE);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::new(content, media_type, name)
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_media_type(&self.media_type)
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Always false; empty documents cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Standard base64 encoding of the payload for inline transport.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.content)
    }
}
