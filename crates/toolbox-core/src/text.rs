//! Text and developer tools.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ToolError;
use crate::types::{ConversionResult, SelectedFile, file_extension, file_stem, mime_from_name, with_extension};

const TEXT_PLAIN: &str = "text/plain";
const APPLICATION_JSON: &str = "application/json";

/// A text or byte transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOp {
    Uppercase,
    Lowercase,
    TitleCase,
    Reverse,
    WordCount,
    Slugify,
    Base64Encode,
    Base64Decode,
    Sha256,
    JsonFormat,
    JsonMinify,
}

impl TextOp {
    /// Whether the input must be valid UTF-8.
    #[must_use]
    pub const fn requires_utf8(self) -> bool {
        !matches!(self, Self::Base64Encode | Self::Sha256)
    }

    /// Run the transform over a file.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnsupportedFormat`] for non-UTF-8 input to a
    /// text-only transform, and [`ToolError::Decode`] when base64 or JSON
    /// input does not parse.
    pub fn apply(self, file: &SelectedFile) -> Result<ConversionResult, ToolError> {
        match self {
            Self::Base64Encode => Ok(ConversionResult::new(
                STANDARD.encode(&file.bytes).into_bytes(),
                format!("{}.b64", file.name),
                TEXT_PLAIN,
            )),
            Self::Sha256 => {
                let line = format!("{}  {}\n", sha256_hex(&file.bytes), file.name);
                Ok(ConversionResult::new(
                    line.into_bytes(),
                    format!("{}.sha256", file.name),
                    TEXT_PLAIN,
                ))
            }
            Self::Base64Decode => {
                let text = utf8(file)?;
                let bytes = base64_decode(text)?;
                let name = decoded_name(&file.name);
                let mime = mime_from_name(&name);
                Ok(ConversionResult::new(bytes, name, mime))
            }
            Self::JsonFormat | Self::JsonMinify => {
                let out = self.transform(utf8(file)?)?;
                Ok(ConversionResult::new(
                    out.into_bytes(),
                    with_extension(&file.name, "json"),
                    APPLICATION_JSON,
                ))
            }
            _ => {
                let out = self.transform(utf8(file)?)?;
                Ok(ConversionResult::new(
                    out.into_bytes(),
                    with_extension(&file.name, "txt"),
                    TEXT_PLAIN,
                ))
            }
        }
    }

    /// Run the transform over text, producing text.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Decode`] for unparsable base64/JSON input, and
    /// [`ToolError::UnsupportedFormat`] if base64 decodes to non-UTF-8 bytes.
    pub fn transform(self, input: &str) -> Result<String, ToolError> {
        Ok(match self {
            Self::Uppercase => input.to_uppercase(),
            Self::Lowercase => input.to_lowercase(),
            Self::TitleCase => title_case(input),
            Self::Reverse => input.chars().rev().collect(),
            Self::WordCount => {
                let stats = TextStats::of(input);
                format!(
                    "words: {}\nlines: {}\ncharacters: {}\n",
                    stats.words, stats.lines, stats.characters
                )
            }
            Self::Slugify => slugify(input),
            Self::Base64Encode => STANDARD.encode(input.as_bytes()),
            Self::Base64Decode => String::from_utf8(base64_decode(input)?).map_err(|_| {
                ToolError::UnsupportedFormat("decoded data is not UTF-8 text".into())
            })?,
            Self::Sha256 => sha256_hex(input.as_bytes()),
            Self::JsonFormat => {
                let value = parse_json(input)?;
                serde_json::to_string_pretty(&value).map_err(|e| ToolError::Encode(e.to_string()))?
            }
            Self::JsonMinify => {
                let value = parse_json(input)?;
                serde_json::to_string(&value).map_err(|e| ToolError::Encode(e.to_string()))?
            }
        })
    }
}

/// Word, line and character counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub words: usize,
    pub lines: usize,
    pub characters: usize,
}

impl TextStats {
    #[must_use]
    pub fn of(input: &str) -> Self {
        Self {
            words: input.split_whitespace().count(),
            lines: input.lines().count(),
            characters: input.chars().count(),
        }
    }
}

/// Lowercase hex SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Capitalize the first letter of each whitespace-separated word.
#[must_use]
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// URL slug: ASCII alphanumerics, lowercased, runs of anything else
/// collapsed to a single `-`, no leading or trailing `-`.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn utf8(file: &SelectedFile) -> Result<&str, ToolError> {
    std::str::from_utf8(&file.bytes)
        .map_err(|_| ToolError::UnsupportedFormat(format!("{} is not UTF-8 text", file.name)))
}

fn base64_decode(input: &str) -> Result<Vec<u8>, ToolError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| ToolError::Decode(format!("invalid base64: {e}")))
}

fn parse_json(input: &str) -> Result<serde_json::Value, ToolError> {
    serde_json::from_str(input).map_err(|e| ToolError::Decode(format!("invalid JSON: {e}")))
}

/// `"photo.png.b64"` → `"photo.png"`, `"blob.txt"` → `"blob.bin"`.
fn decoded_name(name: &str) -> String {
    let stem = file_stem(name);
    if file_extension(stem).is_some() {
        stem.to_owned()
    } else {
        format!("{stem}.bin")
    }
}
