//! Multimodal Content
//!
//! Content payloads exchanged with the model and with tools. A payload is
//! an ordered list of parts; most parts are text, but tools may return
//! binary data (images, audio) alongside it.

use serde::{Deserialize, Serialize};

/// A single part of a multimodal payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text
    Text { text: String },

    /// Binary data, base64-encoded
    Data { media_type: String, base64: String },
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a binary data part
    pub fn data(media_type: impl Into<String>, base64: impl Into<String>) -> Self {
        Self::Data {
            media_type: media_type.into(),
            base64: base64.into(),
        }
    }
}

/// An ordered, immutable-by-convention sequence of content parts
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultimodalContent {
    parts: Vec<ContentPart>,
}

impl MultimodalContent {
    /// Create an empty payload
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a payload with a single text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![ContentPart::text(text)],
        }
    }

    /// Create a payload with a single binary part
    pub fn data(media_type: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            parts: vec![ContentPart::data(media_type, base64)],
        }
    }

    /// Create a payload from parts
    pub fn from_parts(parts: Vec<ContentPart>) -> Self {
        Self { parts }
    }

    /// All parts, in order
    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    /// Append a part
    pub fn push(&mut self, part: ContentPart) {
        self.parts.push(part);
    }

    /// Append all parts of another payload
    pub fn extend(&mut self, other: Self) {
        self.parts.extend(other.parts);
    }

    /// Concatenate several payloads into one, preserving order
    pub fn joined(pieces: impl IntoIterator<Item = Self>) -> Self {
        let mut joined = Self::empty();
        for piece in pieces {
            joined.extend(piece);
        }
        joined
    }

    /// Concatenated text of all text parts (binary parts are skipped)
    pub fn as_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::Data { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Whether the payload has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }
}

impl From<&str> for MultimodalContent {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for MultimodalContent {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl std::fmt::Display for MultimodalContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_text())
    }
}
