//! State behind one tool page: the selected file, the last result and
//! the notification to show.

use std::future::Future;
use std::sync::Arc;

use toolbox_core::registry::{self, ToolDescriptor};
use toolbox_core::{
    ConversionResult, ConvertOptions, FileMeta, Notification, SelectedFile, ToolError,
};
use toolbox_engine::{EngineLoader, ProgressFn};

use crate::convert::Converter;

/// One tool view. Submissions take `&mut self`, so a session runs at
/// most one conversion at a time; separate sessions share the converter.
#[derive(Debug)]
pub struct ToolSession<L: EngineLoader> {
    converter: Arc<Converter<L>>,
    tool: &'static ToolDescriptor,
    file: Option<SelectedFile>,
    result: Option<ConversionResult>,
    notification: Option<Notification>,
}

impl<L: EngineLoader> ToolSession<L> {
    /// Open a session for `tool_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] if no tool has this id.
    pub fn new(converter: Arc<Converter<L>>, tool_id: &str) -> Result<Self, ToolError> {
        Ok(Self {
            converter,
            tool: registry::require(tool_id)?,
            file: None,
            result: None,
            notification: None,
        })
    }

    #[must_use]
    pub const fn tool(&self) -> &'static ToolDescriptor {
        self.tool
    }

    #[must_use]
    pub const fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    #[must_use]
    pub const fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub const fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Clear the current notification.
    pub fn dismiss(&mut self) {
        self.notification = None;
    }

    /// Select a file. The size limit is checked against `meta` first;
    /// `read` is only called for files within it.
    ///
    /// On success the file replaces any previous one and clears the last
    /// result and notification. On failure the session is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::FileTooLarge`] without calling `read`, or the
    /// error `read` returns.
    pub async fn select_file<F, Fut>(&mut self, meta: FileMeta, read: F) -> Result<(), ToolError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, ToolError>>,
    {
        self.converter.config().check_file_size(&meta)?;
        let bytes = read().await?;
        tracing::debug!(tool = self.tool.id, name = %meta.name, bytes = bytes.len(), "file selected");

        self.file = Some(SelectedFile::new(meta.name, meta.mime_type, bytes));
        self.result = None;
        self.notification = None;
        Ok(())
    }

    /// Run the tool over the selected file.
    ///
    /// The outcome is stored: a result replaces the previous one and
    /// clears the notification; an error becomes the notification and
    /// drops any stale result.
    ///
    /// # Errors
    ///
    /// Returns the stored notification when the run fails.
    pub async fn submit(
        &mut self,
        options: &ConvertOptions,
        on_progress: Option<ProgressFn>,
    ) -> Result<&ConversionResult, &Notification> {
        let outcome = match &self.file {
            Some(file) => {
                self.converter
                    .convert(file, self.tool.id, options, on_progress)
                    .await
            }
            None => Err(ToolError::InvalidInput("choose a file first".into())),
        };

        match outcome {
            Ok(result) => {
                self.notification = None;
                Ok(&*self.result.insert(result))
            }
            Err(e) => {
                self.result = None;
                Err(&*self.notification.insert(e.notification()))
            }
        }
    }

    /// Hand the result to the download action, removing it from the
    /// session.
    pub fn take_result(&mut self) -> Option<ConversionResult> {
        self.result.take()
    }
}
