//! Reading picked files.
//!
//! The size limit is checked against the `File` metadata before any bytes
//! are read, so oversized files never reach memory.

use toolbox_core::{FileMeta, SelectedFile, ToolError, ToolboxConfig};
use wasm_bindgen_futures::JsFuture;

/// Metadata of a picked file from the values the browser reports.
///
/// `size` comes from `Blob.size`, a JS number; negative or fractional
/// values cannot occur for real files and are floored at zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Blob.size is a non-negative integer
pub fn file_meta(name: &str, size: f64, mime_type: &str) -> FileMeta {
    FileMeta {
        name: name.to_owned(),
        size: size.max(0.0) as u64,
        mime_type: mime_type.to_owned(),
    }
}

/// Check `file` against the size limit, then read it.
///
/// # Errors
///
/// Returns [`ToolError::FileTooLarge`] without reading when the file
/// exceeds `config.max_file_size`, and [`ToolError::Read`] when the
/// browser fails to read it.
#[allow(clippy::future_not_send)] // WASM is single-threaded; File is !Send
pub async fn read_file(file: &web_sys::File, config: &ToolboxConfig) -> Result<SelectedFile, ToolError> {
    let meta = file_meta(&file.name(), file.size(), &file.type_());
    config.check_file_size(&meta)?;

    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ToolError::Read(format!("{}: {e:?}", meta.name)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    tracing::debug!(name = %meta.name, bytes = bytes.len(), "file read");

    Ok(SelectedFile::new(meta.name, meta.mime_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_keeps_browser_values() {
        let meta = file_meta("clip.mp4", 1024.0, "video/mp4");
        assert_eq!(
            meta,
            FileMeta {
                name: "clip.mp4".into(),
                size: 1024,
                mime_type: "video/mp4".into(),
            }
        );
    }

    #[test]
    fn negative_size_floors_at_zero() {
        assert_eq!(file_meta("x", -1.0, "").size, 0);
    }

    #[test]
    fn oversized_meta_is_rejected() {
        let config = ToolboxConfig::default();
        let limit = config.max_file_size;
        #[allow(clippy::cast_precision_loss)]
        let meta = file_meta("huge.mov", (limit + 1) as f64, "video/quicktime");
        assert_eq!(
            config.check_file_size(&meta),
            Err(ToolError::FileTooLarge {
                size: limit + 1,
                limit,
            })
        );
    }
}
