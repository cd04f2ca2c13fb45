//! Media (video/audio) operations handled by the video engine.
//!
//! This module only describes the operations; turning them into engine
//! command lines happens in `toolbox-engine`.

use serde::{Deserialize, Serialize};

use crate::types::SelectedFile;

/// Audio output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    /// AAC in an MPEG-4 container (`.m4a`).
    Aac,
    Ogg,
}

impl AudioFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Aac => "m4a",
            Self::Ogg => "ogg",
        }
    }

    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Aac => "audio/mp4",
            Self::Ogg => "audio/ogg",
        }
    }
}

/// Video container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoContainer {
    Mp4,
    Webm,
    Mov,
}

impl VideoContainer {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Mov => "mov",
        }
    }

    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Webm => "video/webm",
            Self::Mov => "video/quicktime",
        }
    }
}

/// A media operation run through the video engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaOp {
    /// Drop the video stream and re-encode the audio.
    ExtractAudio(AudioFormat),
    /// Re-encode into another container.
    Transcode(VideoContainer),
    /// Cut `[start, start + duration)` without re-encoding.
    Trim,
    /// Drop the audio stream, copy video.
    Mute,
    /// Render an animated GIF.
    Gif,
}

impl MediaOp {
    /// Whether this operation accepts audio-only input.
    #[must_use]
    pub const fn accepts_audio(self) -> bool {
        matches!(self, Self::ExtractAudio(_) | Self::Trim)
    }

    /// Whether `file` looks like input this operation can handle.
    #[must_use]
    pub fn accepts(self, file: &SelectedFile) -> bool {
        let mime = file.mime_type.as_str();
        mime.starts_with("video/") || (self.accepts_audio() && mime.starts_with("audio/"))
    }
}
