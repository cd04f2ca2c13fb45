//! Result download via Blob URLs.
//!
//! The browser has no direct "save these bytes" call, so the result is
//! wrapped in a `Blob`, given an object URL and fetched through a
//! temporary `<a download>` element that is clicked and removed.

use toolbox_core::ConversionResult;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::BlobPropertyBag;

/// Errors that can occur when triggering a download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// File name safe to offer as `download=`: directory parts, control
/// characters and characters Windows rejects become `_`. Empty or
/// dot-only names become `download`.
#[must_use]
pub fn download_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        return "download".to_owned();
    }
    cleaned
}

/// Offer `result` to the user as a file download.
///
/// The object URL is revoked after the click.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if any browser API call fails.
pub fn trigger_download(result: &ConversionResult) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(result.bytes.as_slice()));
    let opts = BlobPropertyBag::new();
    opts.set_type(&result.mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|e| DownloadError::JsError(format!("failed to cast element: {e:?}")))?;
    anchor.set_href(&url);
    anchor.set_download(&download_filename(&result.name));

    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();

    // The download has started; cleanup failures are not download failures.
    let _ = body.remove_child(&anchor);
    let _ = web_sys::Url::revoke_object_url(&url);

    tracing::debug!(name = %result.name, bytes = result.bytes.len(), "download triggered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_kept() {
        assert_eq!(download_filename("Holiday Clip.mp3"), "Holiday Clip.mp3");
    }

    #[test]
    fn separators_and_reserved_characters_are_replaced() {
        assert_eq!(download_filename("../etc/passwd"), ".._etc_passwd");
        assert_eq!(download_filename("a:b*c?.png"), "a_b_c_.png");
        assert_eq!(download_filename("tab\there.txt"), "tab_here.txt");
    }

    #[test]
    fn empty_names_get_a_fallback() {
        assert_eq!(download_filename(""), "download");
        assert_eq!(download_filename("  .. "), "download");
    }
}
