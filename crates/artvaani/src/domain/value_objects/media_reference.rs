//! MediaReference - Opaque encoded image/audio content
//!
//! Media travels as a data URI (`data:<mime>;base64,<payload>`). Only the
//! envelope is inspected; the payload bytes are passed through untouched.

use serde::{Deserialize, Serialize};

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Family of a media content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

/// Encoded binary content plus its content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaReference {
    uri: String,
    content_type_end: usize,
    payload_start: usize,
}

impl MediaReference {
    /// Parse a data URI, checking the envelope only
    pub fn parse(uri: impl Into<String>) -> Result<Self, String> {
        let uri = uri.into();

        let rest = uri
            .strip_prefix(DATA_PREFIX)
            .ok_or_else(|| "must be a data URI starting with 'data:'".to_string())?;

        let marker = rest
            .find(BASE64_MARKER)
            .ok_or_else(|| "must use base64 encoding ('data:<mimetype>;base64,<data>')".to_string())?;

        let content_type = &rest[..marker];
        if content_type.is_empty() || !content_type.contains('/') {
            return Err("must include a MIME type".to_string());
        }

        let content_type_end = DATA_PREFIX.len() + marker;
        let payload_start = content_type_end + BASE64_MARKER.len();
        if payload_start >= uri.len() {
            return Err("must not have an empty payload".to_string());
        }

        Ok(Self {
            uri,
            content_type_end,
            payload_start,
        })
    }

    /// MIME type, e.g. `image/jpeg`
    pub fn content_type(&self) -> &str {
        &self.uri[DATA_PREFIX.len()..self.content_type_end]
    }

    /// Base64 payload, still encoded
    pub fn payload(&self) -> &str {
        &self.uri[self.payload_start..]
    }

    /// The full data URI
    pub fn as_uri(&self) -> &str {
        &self.uri
    }

    pub fn kind(&self) -> Option<MediaKind> {
        let family = self.content_type().split('/').next()?;
        match family.to_ascii_lowercase().as_str() {
            "image" => Some(MediaKind::Image),
            "audio" => Some(MediaKind::Audio),
            _ => None,
        }
    }
}

impl TryFrom<String> for MediaReference {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<MediaReference> for String {
    fn from(media: MediaReference) -> Self {
        media.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_uri() {
        let media = MediaReference::parse("data:image/jpeg;base64,/9j/4AAQSkZJRg==").unwrap();
        assert_eq!(media.content_type(), "image/jpeg");
        assert_eq!(media.payload(), "/9j/4AAQSkZJRg==");
        assert_eq!(media.kind(), Some(MediaKind::Image));
    }

    #[test]
    fn test_parse_audio_uri() {
        let media = MediaReference::parse("data:audio/webm;base64,GkXfo59ChoEBQveBAULygQ").unwrap();
        assert_eq!(media.kind(), Some(MediaKind::Audio));
    }

    #[test]
    fn test_rejects_malformed_envelopes() {
        assert!(MediaReference::parse("https://example.com/pot.jpg").is_err());
        assert!(MediaReference::parse("data:image/png,rawbytes").is_err());
        assert!(MediaReference::parse("data:;base64,AAAA").is_err());
        assert!(MediaReference::parse("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_unknown_family_has_no_kind() {
        let media = MediaReference::parse("data:application/pdf;base64,JVBERi0x").unwrap();
        assert_eq!(media.kind(), None);
    }

    #[test]
    fn test_serde_as_string() {
        let media = MediaReference::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        let json = serde_json::to_string(&media).unwrap();
        assert_eq!(json, "\"data:image/png;base64,iVBORw0KGgo=\"");

        let back: MediaReference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, media);
        assert!(serde_json::from_str::<MediaReference>("\"not-a-uri\"").is_err());
    }
}
