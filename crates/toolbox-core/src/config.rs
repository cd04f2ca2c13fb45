//! Tool configuration and input limits.

use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::types::FileMeta;

/// Limits and defaults applied to every tool run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolboxConfig {
    /// Largest accepted input file in bytes.
    pub max_file_size: u64,

    /// Encoder quality in `[0, 1]` used when a run does not specify one.
    pub default_quality: f32,

    /// Largest raster surface (width × height) an image tool may allocate.
    pub max_surface_pixels: u64,

    /// Frame rate for video-to-GIF when a run does not specify one.
    pub gif_fps: u32,

    /// Output width for video-to-GIF when a run does not specify one.
    pub gif_width: u32,
}

impl ToolboxConfig {
    /// 100 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
    /// Matches the browser canvas default for lossy encoders.
    pub const DEFAULT_QUALITY: f32 = 0.92;
    /// 16384 × 16384, the common browser canvas area limit.
    pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 16_384 * 16_384;
    pub const DEFAULT_GIF_FPS: u32 = 10;
    pub const DEFAULT_GIF_WIDTH: u32 = 480;

    /// Reject `meta` if it exceeds [`max_file_size`](Self::max_file_size).
    ///
    /// Only looks at the metadata, so callers can run it before reading
    /// any bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::FileTooLarge`] when the file is over the limit.
    pub fn check_file_size(&self, meta: &FileMeta) -> Result<(), ToolError> {
        if meta.size > self.max_file_size {
            return Err(ToolError::FileTooLarge {
                size: meta.size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Resolve a per-run quality override against the configured default,
    /// clamped to `[0, 1]`.
    #[must_use]
    pub fn quality(&self, requested: Option<f32>) -> f32 {
        requested
            .filter(|q| q.is_finite())
            .unwrap_or(self.default_quality)
            .clamp(0.0, 1.0)
    }
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            default_quality: Self::DEFAULT_QUALITY,
            max_surface_pixels: Self::DEFAULT_MAX_SURFACE_PIXELS,
            gif_fps: Self::DEFAULT_GIF_FPS,
            gif_width: Self::DEFAULT_GIF_WIDTH,
        }
    }
}
