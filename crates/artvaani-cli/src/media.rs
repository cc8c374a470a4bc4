//! Local files -> `data:<mime>;base64,<payload>` URIs

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
        }
    }
}

/// Mime type for `path`, judged by extension
pub fn guess_mime(path: &Path, kind: MediaKind) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();

    let mime = match (kind, ext.as_str()) {
        (MediaKind::Image, "jpg" | "jpeg") => "image/jpeg",
        (MediaKind::Image, "png") => "image/png",
        (MediaKind::Image, "webp") => "image/webp",
        (MediaKind::Image, "gif") => "image/gif",
        (MediaKind::Image, "heic" | "heif") => "image/heic",
        (MediaKind::Audio, "webm") => "audio/webm",
        (MediaKind::Audio, "wav") => "audio/wav",
        (MediaKind::Audio, "mp3") => "audio/mpeg",
        (MediaKind::Audio, "ogg" | "oga") => "audio/ogg",
        (MediaKind::Audio, "m4a") => "audio/mp4",
        (MediaKind::Audio, "flac") => "audio/flac",
        _ => bail!(
            "Cannot tell the {} type of {:?} from its extension",
            kind.label(),
            path
        ),
    };
    Ok(mime)
}

pub fn encode_bytes(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

/// Read `path` and encode it as a data URI
pub fn read_as_data_uri(path: &Path, kind: MediaKind) -> Result<String> {
    let mime = guess_mime(path, kind)?;
    let bytes = fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    if bytes.is_empty() {
        bail!("File is empty: {:?}", path);
    }
    tracing::debug!(?path, mime, size = bytes.len(), "Encoded media file");
    Ok(encode_bytes(mime, &bytes))
}
