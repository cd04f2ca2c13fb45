//! Shared types: selected files, conversion results, tool options.

use serde::{Deserialize, Serialize};

/// Metadata of a user-provided file, known before its bytes are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    /// File name as provided by the picker (no directory part).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type; may be empty when the browser or OS does not know it.
    pub mime_type: String,
}

/// A user-provided file for one conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name as provided by the picker.
    pub name: String,
    /// MIME type. Filled from the extension when the source did not say.
    pub mime_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Create a selected file, inferring the MIME type from the name when
    /// `mime_type` is empty.
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mut mime_type = mime_type.into();
        if mime_type.is_empty() {
            mime_type = mime_from_name(&name).to_owned();
        }
        Self {
            name,
            mime_type,
            bytes,
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Metadata view of this file.
    #[must_use]
    pub fn meta(&self) -> FileMeta {
        FileMeta {
            name: self.name.clone(),
            size: self.size(),
            mime_type: self.mime_type.clone(),
        }
    }

    /// File name without its final extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }

    /// Lowercased final extension, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        file_extension(&self.name)
    }
}

/// Output of a tool run, ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// Encoded output.
    pub bytes: Vec<u8>,
    /// Suggested download file name.
    pub name: String,
    /// MIME type of `bytes`.
    pub mime_type: String,
}

impl ConversionResult {
    #[must_use]
    pub fn new(bytes: Vec<u8>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Size of the output in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Per-run tool parameters. Each tool reads only the fields it needs and
/// falls back to configured defaults for the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Lossy encoder quality in `[0, 1]`.
    pub quality: Option<f32>,
    /// Strength of an enhancement (blur sigma, brightness delta, contrast
    /// percentage).
    pub amount: Option<f32>,
    /// Media start offset in seconds.
    pub start: Option<f64>,
    /// Media duration in seconds.
    pub duration: Option<f64>,
    /// Frames per second for animated output.
    pub fps: Option<u32>,
    /// Output width in pixels for scaled output.
    pub width: Option<u32>,
}

/// File name without its final extension (`"clip.tar.gz"` → `"clip.tar"`).
///
/// A leading dot is not treated as an extension separator.
#[must_use]
pub fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Lowercased final extension of `name`, if any.
#[must_use]
pub fn file_extension(name: &str) -> Option<String> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_ascii_lowercase()),
        _ => None,
    }
}

/// Replace the extension of `name` with `ext`.
#[must_use]
pub fn with_extension(name: &str, ext: &str) -> String {
    format!("{}.{ext}", file_stem(name))
}

/// Known extensions and their MIME types.
const MIME_TABLE: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("gif", "image/gif"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("m4a", "audio/mp4"),
    ("aac", "audio/aac"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("json", "application/json"),
];

/// Fallback MIME type for unknown content.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Preferred extension for a MIME type, ignoring parameters such as
/// `; codecs=...`.
#[must_use]
pub fn extension_from_mime(mime: &str) -> Option<&'static str> {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    MIME_TABLE
        .iter()
        .find(|(_, known)| known.eq_ignore_ascii_case(essence))
        .map(|(ext, _)| *ext)
}

/// Guess a MIME type from a file name's extension.
#[must_use]
pub fn mime_from_name(name: &str) -> &'static str {
    file_extension(name)
        .and_then(|ext| {
            MIME_TABLE
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(OCTET_STREAM)
}
