//! toolbox-core: tool registry and pure conversion routines (sans-IO).
//!
//! Everything here operates on in-memory byte slices and returns
//! structured data. Browser interaction lives in `toolbox-io`, the video
//! engine in `toolbox-engine`, and strategy dispatch in `toolbox`.

pub mod age;
pub mod config;
pub mod enhance;
pub mod error;
pub mod media;
pub mod raster;
pub mod registry;
pub mod text;
pub mod types;

pub use config::ToolboxConfig;
pub use enhance::EnhanceOp;
pub use error::{ErrorKind, Notification, ToolError};
pub use media::{AudioFormat, MediaOp, VideoContainer};
pub use raster::ImageFormat;
pub use registry::{Category, ToolDescriptor, ToolStrategy};
pub use text::TextOp;
pub use types::{ConversionResult, ConvertOptions, FileMeta, SelectedFile};
