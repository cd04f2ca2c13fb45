//! Copying text results to the clipboard.
//!
//! Requires a browser environment and a user-gesture context (call from
//! a click handler).

use toolbox_core::ConversionResult;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Errors that can occur when copying a result.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// A browser API call returned an error or a required object was missing.
    #[error("clipboard API error: {0}")]
    JsError(String),

    /// The result is binary and cannot be copied as text.
    #[error("{0} is not a text result")]
    NotText(String),
}

impl From<JsValue> for ClipboardError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

const TEXT_MIME_TYPES: &[&str] = &["application/json", "application/xml", "image/svg+xml"];

/// Text content of `result`, if it is a text result.
///
/// # Errors
///
/// Returns [`ClipboardError::NotText`] unless the MIME type is textual
/// and the bytes are valid UTF-8.
pub fn result_text(result: &ConversionResult) -> Result<&str, ClipboardError> {
    let mime = result
        .mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();
    let textual = mime.starts_with("text/") || TEXT_MIME_TYPES.contains(&mime);
    if !textual {
        return Err(ClipboardError::NotText(result.name.clone()));
    }
    std::str::from_utf8(&result.bytes).map_err(|_| ClipboardError::NotText(result.name.clone()))
}

/// Copy a text result to the system clipboard.
///
/// # Errors
///
/// Returns [`ClipboardError::NotText`] for binary results and
/// [`ClipboardError::JsError`] if the clipboard is unavailable or the
/// write is refused.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Clipboard is !Send
pub async fn copy_result(result: &ConversionResult) -> Result<(), ClipboardError> {
    let text = result_text(result)?;
    let window =
        web_sys::window().ok_or_else(|| ClipboardError::JsError("no global window".into()))?;
    let clipboard = window.navigator().clipboard();
    JsFuture::from(clipboard.write_text(text)).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn text_results_are_copyable() {
        let result = ConversionResult::new(b"HELLO".to_vec(), "note.txt", "text/plain; charset=utf-8");
        assert_eq!(result_text(&result).unwrap(), "HELLO");
    }

    #[test]
    fn json_results_are_copyable() {
        let result = ConversionResult::new(b"{}".to_vec(), "data.json", "application/json");
        assert_eq!(result_text(&result).unwrap(), "{}");
    }

    #[test]
    fn images_are_not_copyable() {
        let result = ConversionResult::new(vec![0x89, b'P'], "photo.png", "image/png");
        assert!(matches!(result_text(&result), Err(ClipboardError::NotText(name)) if name == "photo.png"));
    }

    #[test]
    fn invalid_utf8_is_not_copyable() {
        let result = ConversionResult::new(vec![0xff, 0xfe], "broken.txt", "text/plain");
        assert!(result_text(&result).is_err());
    }
}
