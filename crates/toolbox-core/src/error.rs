//! The closed error taxonomy shared by every tool.
//!
//! Errors never escape a tool session: the session turns them into a
//! [`Notification`] and the application stays usable.

use serde::{Deserialize, Serialize};

/// Everything that can go wrong while running a tool.
///
/// Payloads are plain strings so the error is `Clone` and can cross
/// worker/serialization boundaries unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum ToolError {
    /// The selected file exceeds the configured size limit.
    #[error("file is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge {
        /// Size of the rejected file in bytes.
        size: u64,
        /// The configured limit in bytes.
        limit: u64,
    },

    /// The input is not a format this tool accepts, or the requested
    /// output format is unknown.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The source could not be decoded.
    #[error("failed to decode input: {0}")]
    Decode(String),

    /// The output could not be encoded.
    #[error("failed to encode output: {0}")]
    Encode(String),

    /// The video engine failed to initialize.
    #[error("video engine failed to load: {0}")]
    EngineLoad(String),

    /// The video engine failed to run a command.
    #[error("video engine command failed: {0}")]
    EngineCommand(String),

    /// The selected file could not be read.
    #[error("failed to read file: {0}")]
    Read(String),

    /// No tool is registered under this id.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The tool options or the non-file input are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Discriminant of [`ToolError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FileTooLarge,
    UnsupportedFormat,
    Decode,
    Encode,
    EngineLoad,
    EngineCommand,
    Read,
    UnknownTool,
    InvalidInput,
}

impl ToolError {
    /// The payload-free kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Encode(_) => ErrorKind::Encode,
            Self::EngineLoad(_) => ErrorKind::EngineLoad,
            Self::EngineCommand(_) => ErrorKind::EngineCommand,
            Self::Read(_) => ErrorKind::Read,
            Self::UnknownTool(_) => ErrorKind::UnknownTool,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    /// Build the user-facing notification for this error.
    #[must_use]
    pub fn notification(&self) -> Notification {
        Notification {
            title: self.kind().title().to_owned(),
            message: self.to_string(),
        }
    }
}

impl ErrorKind {
    /// Short headline shown above the error message.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FileTooLarge => "File too large",
            Self::UnsupportedFormat => "Unsupported format",
            Self::Decode => "Could not read the input",
            Self::Encode => "Could not create the output",
            Self::EngineLoad => "Video engine unavailable",
            Self::EngineCommand => "Processing failed",
            Self::Read => "Could not read the file",
            Self::UnknownTool => "Unknown tool",
            Self::InvalidInput => "Invalid input",
        }
    }
}

/// A user-facing error notification (title + message).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short headline.
    pub title: String,
    /// Detail line.
    pub message: String,
}

impl From<ToolError> for Notification {
    fn from(err: ToolError) -> Self {
        err.notification()
    }
}
