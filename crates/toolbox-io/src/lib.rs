//! toolbox-io: browser I/O.
//!
//! Reads picked files (after checking their size), triggers Blob
//! downloads of conversion results and copies text results to the
//! clipboard. The browser calls require `wasm32-unknown-unknown`; the
//! naming and validation helpers are plain functions.

pub mod clipboard;
pub mod download;
pub mod upload;

pub use clipboard::{ClipboardError, copy_result, result_text};
pub use download::{DownloadError, download_filename, trigger_download};
pub use upload::{file_meta, read_file};
