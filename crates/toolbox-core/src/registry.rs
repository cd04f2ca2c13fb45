//! Static tool registry: every tool's id, category, route and strategy.
//!
//! The table is leaf data. Ids and paths are unique, and every path is
//! `/{category}/{id}`; the tests below keep it that way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enhance::EnhanceOp;
use crate::error::ToolError;
use crate::media::{AudioFormat, MediaOp, VideoContainer};
use crate::raster::ImageFormat;
use crate::text::TextOp;

/// Tool categories, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Image,
    Video,
    Audio,
    Text,
    Developer,
    Calculator,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::Text,
        Self::Developer,
        Self::Calculator,
    ];

    /// URL segment.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::Developer => "developer",
            Self::Calculator => "calculator",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Image => "Image Tools",
            Self::Video => "Video Tools",
            Self::Audio => "Audio Tools",
            Self::Text => "Text Tools",
            Self::Developer => "Developer Tools",
            Self::Calculator => "Calculators",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Image => "Convert, sharpen and adjust images in your browser.",
            Self::Video => "Convert, trim and mute videos or turn them into GIFs.",
            Self::Audio => "Convert and trim audio files.",
            Self::Text => "Change case, count words and build slugs.",
            Self::Developer => "Encode, hash and format data.",
            Self::Calculator => "Everyday calculators.",
        }
    }

    /// Route of the category index page.
    #[must_use]
    pub fn path(self) -> String {
        format!("/{}", self.slug())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ToolError::InvalidInput(format!("unknown category: {s}")))
    }
}

/// How a tool turns its input into output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStrategy {
    /// Re-encode an image in another format.
    ImageConvert(ImageFormat),
    /// Filter an image, keeping its format.
    ImageEnhance(EnhanceOp),
    /// Run a media operation through the video engine.
    Media(MediaOp),
    /// Transform text or bytes.
    Text(TextOp),
    /// Interactive calculator; takes no file.
    Calculator,
}

impl ToolStrategy {
    /// Whether the tool consumes an uploaded file.
    #[must_use]
    pub const fn takes_file(self) -> bool {
        !matches!(self, Self::Calculator)
    }
}

/// One entry of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    /// Stable id, unique across the registry.
    pub id: &'static str,
    pub category: Category,
    pub name: &'static str,
    pub description: &'static str,
    /// Route, `/{category}/{id}`.
    pub path: &'static str,
    #[serde(skip)]
    pub strategy: ToolStrategy,
}

macro_rules! tool {
    ($category:ident, $slug:literal, $id:literal, $name:literal, $description:literal, $strategy:expr $(,)?) => {
        ToolDescriptor {
            id: $id,
            category: Category::$category,
            name: $name,
            description: $description,
            path: concat!("/", $slug, "/", $id),
            strategy: $strategy,
        }
    };
}

use ToolStrategy::{Calculator, ImageConvert, ImageEnhance, Media, Text};

static TOOLS: &[ToolDescriptor] = &[
    // Image
    tool!(Image, "image", "png-to-jpg", "PNG to JPG", "Convert PNG images to JPG.", ImageConvert(ImageFormat::Jpeg)),
    tool!(Image, "image", "jpg-to-png", "JPG to PNG", "Convert JPG photos to lossless PNG.", ImageConvert(ImageFormat::Png)),
    tool!(Image, "image", "png-to-webp", "PNG to WebP", "Convert PNG images to WebP.", ImageConvert(ImageFormat::Webp)),
    tool!(Image, "image", "jpg-to-webp", "JPG to WebP", "Convert JPG photos to WebP.", ImageConvert(ImageFormat::Webp)),
    tool!(Image, "image", "webp-to-png", "WebP to PNG", "Convert WebP images to PNG.", ImageConvert(ImageFormat::Png)),
    tool!(Image, "image", "webp-to-jpg", "WebP to JPG", "Convert WebP images to JPG.", ImageConvert(ImageFormat::Jpeg)),
    tool!(Image, "image", "image-to-bmp", "Image to BMP", "Convert any image to a BMP bitmap.", ImageConvert(ImageFormat::Bmp)),
    tool!(Image, "image", "image-to-gif", "Image to GIF", "Convert any image to GIF.", ImageConvert(ImageFormat::Gif)),
    tool!(Image, "image", "image-to-tiff", "Image to TIFF", "Convert any image to TIFF.", ImageConvert(ImageFormat::Tiff)),
    tool!(Image, "image", "image-sharpener", "Image Sharpener", "Sharpen blurry photos.", ImageEnhance(EnhanceOp::Sharpen)),
    tool!(Image, "image", "image-blur", "Blur Image", "Apply a Gaussian blur.", ImageEnhance(EnhanceOp::Blur)),
    tool!(Image, "image", "image-grayscale", "Grayscale Image", "Turn a color image into grayscale.", ImageEnhance(EnhanceOp::Grayscale)),
    tool!(Image, "image", "image-brightness", "Adjust Brightness", "Brighten or darken an image.", ImageEnhance(EnhanceOp::Brightness)),
    tool!(Image, "image", "image-contrast", "Adjust Contrast", "Increase or reduce contrast.", ImageEnhance(EnhanceOp::Contrast)),
    tool!(Image, "image", "image-invert", "Invert Colors", "Invert the colors of an image.", ImageEnhance(EnhanceOp::Invert)),
    // Video
    tool!(Video, "video", "video-to-mp3", "Video to MP3", "Extract the soundtrack of a video as MP3.", Media(MediaOp::ExtractAudio(AudioFormat::Mp3))),
    tool!(Video, "video", "video-to-wav", "Video to WAV", "Extract the soundtrack of a video as WAV.", Media(MediaOp::ExtractAudio(AudioFormat::Wav))),
    tool!(Video, "video", "video-to-mp4", "Convert to MP4", "Convert a video to MP4 (H.264/AAC).", Media(MediaOp::Transcode(VideoContainer::Mp4))),
    tool!(Video, "video", "video-to-webm", "Convert to WebM", "Convert a video to WebM (VP9/Opus).", Media(MediaOp::Transcode(VideoContainer::Webm))),
    tool!(Video, "video", "video-to-mov", "Convert to MOV", "Convert a video to QuickTime MOV.", Media(MediaOp::Transcode(VideoContainer::Mov))),
    tool!(Video, "video", "video-trimmer", "Trim Video", "Cut a clip out of a video.", Media(MediaOp::Trim)),
    tool!(Video, "video", "video-muter", "Mute Video", "Remove the audio track from a video.", Media(MediaOp::Mute)),
    tool!(Video, "video", "video-to-gif", "Video to GIF", "Turn a video clip into an animated GIF.", Media(MediaOp::Gif)),
    // Audio
    tool!(Audio, "audio", "audio-to-mp3", "Convert to MP3", "Convert audio to MP3.", Media(MediaOp::ExtractAudio(AudioFormat::Mp3))),
    tool!(Audio, "audio", "audio-to-wav", "Convert to WAV", "Convert audio to uncompressed WAV.", Media(MediaOp::ExtractAudio(AudioFormat::Wav))),
    tool!(Audio, "audio", "audio-to-m4a", "Convert to M4A", "Convert audio to AAC in M4A.", Media(MediaOp::ExtractAudio(AudioFormat::Aac))),
    tool!(Audio, "audio", "audio-to-ogg", "Convert to OGG", "Convert audio to Ogg Vorbis.", Media(MediaOp::ExtractAudio(AudioFormat::Ogg))),
    tool!(Audio, "audio", "audio-trimmer", "Trim Audio", "Cut a section out of an audio file.", Media(MediaOp::Trim)),
    // Text
    tool!(Text, "text", "uppercase", "Uppercase Converter", "Convert text to UPPERCASE.", Text(TextOp::Uppercase)),
    tool!(Text, "text", "lowercase", "Lowercase Converter", "Convert text to lowercase.", Text(TextOp::Lowercase)),
    tool!(Text, "text", "title-case", "Title Case Converter", "Capitalize Every Word.", Text(TextOp::TitleCase)),
    tool!(Text, "text", "reverse-text", "Reverse Text", "Reverse the characters of a text.", Text(TextOp::Reverse)),
    tool!(Text, "text", "word-counter", "Word Counter", "Count words, lines and characters.", Text(TextOp::WordCount)),
    tool!(Text, "text", "slug-generator", "Slug Generator", "Turn a title into a URL slug.", Text(TextOp::Slugify)),
    // Developer
    tool!(Developer, "developer", "base64-encode", "Base64 Encoder", "Encode any file as base64.", Text(TextOp::Base64Encode)),
    tool!(Developer, "developer", "base64-decode", "Base64 Decoder", "Decode base64 back to a file.", Text(TextOp::Base64Decode)),
    tool!(Developer, "developer", "sha256-hash", "SHA-256 Hash", "Compute the SHA-256 checksum of a file.", Text(TextOp::Sha256)),
    tool!(Developer, "developer", "json-formatter", "JSON Formatter", "Pretty-print JSON.", Text(TextOp::JsonFormat)),
    tool!(Developer, "developer", "json-minifier", "JSON Minifier", "Strip whitespace from JSON.", Text(TextOp::JsonMinify)),
    // Calculator
    tool!(Calculator, "calculator", "age-calculator", "Age Calculator", "Exact age in years, months and days.", Calculator),
];

/// Every registered tool, in navigation order.
#[must_use]
pub fn tools() -> &'static [ToolDescriptor] {
    TOOLS
}

/// Look a tool up by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.id == id)
}

/// Look a tool up by id, failing with [`ToolError::UnknownTool`].
///
/// # Errors
///
/// Returns [`ToolError::UnknownTool`] if no tool has this id.
pub fn require(id: &str) -> Result<&'static ToolDescriptor, ToolError> {
    find(id).ok_or_else(|| ToolError::UnknownTool(id.to_owned()))
}

/// Look a tool up by route. A trailing slash is ignored.
#[must_use]
pub fn find_by_path(path: &str) -> Option<&'static ToolDescriptor> {
    let path = path.strip_suffix('/').unwrap_or(path);
    TOOLS.iter().find(|t| t.path == path)
}

/// Tools of one category, in navigation order.
pub fn in_category(category: Category) -> impl Iterator<Item = &'static ToolDescriptor> {
    TOOLS.iter().filter(move |t| t.category == category)
}

/// Case-insensitive search over id, name and description.
#[must_use]
pub fn search(query: &str) -> Vec<&'static ToolDescriptor> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    TOOLS
        .iter()
        .filter(|t| {
            t.id.contains(&needle)
                || t.name.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_and_paths_are_unique() {
        let ids: HashSet<_> = TOOLS.iter().map(|t| t.id).collect();
        let paths: HashSet<_> = TOOLS.iter().map(|t| t.path).collect();
        assert_eq!(ids.len(), TOOLS.len());
        assert_eq!(paths.len(), TOOLS.len());
    }

    #[test]
    fn path_matches_category_and_id() {
        for tool in TOOLS {
            assert_eq!(
                tool.path,
                format!("/{}/{}", tool.category.slug(), tool.id),
                "{}",
                tool.id
            );
        }
    }

    #[test]
    fn every_category_has_tools() {
        for category in Category::ALL {
            assert!(in_category(category).next().is_some(), "{category}");
        }
    }

    #[test]
    fn lookups() {
        let tool = find("png-to-jpg");
        assert_eq!(
            tool.map(|t| t.strategy),
            Some(ToolStrategy::ImageConvert(ImageFormat::Jpeg))
        );
        assert_eq!(find_by_path("/video/video-to-gif/").map(|t| t.id), Some("video-to-gif"));
        assert!(matches!(require("nope"), Err(ToolError::UnknownTool(_))));
    }

    #[test]
    fn search_is_case_insensitive() {
        let hits: Vec<_> = search("WEBP").into_iter().map(|t| t.id).collect();
        assert!(hits.contains(&"png-to-webp"));
        assert!(hits.contains(&"webp-to-png"));
        assert!(search("   ").is_empty());
    }

    #[test]
    fn category_parse() {
        assert_eq!("Video".parse::<Category>().ok(), Some(Category::Video));
        assert!("games".parse::<Category>().is_err());
    }

    #[test]
    fn only_calculators_skip_files() {
        for tool in TOOLS {
            assert_eq!(
                tool.strategy.takes_file(),
                tool.category != Category::Calculator,
                "{}",
                tool.id
            );
        }
    }
}
