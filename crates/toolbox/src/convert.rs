//! Tool dispatch.

use toolbox_core::registry::{self, ToolStrategy};
use toolbox_core::{
    ConversionResult, ConvertOptions, MediaOp, SelectedFile, ToolError, ToolboxConfig, enhance,
    raster,
};
use toolbox_engine::{EngineHandle, EngineLoader, ProgressFn, build_job};
use web_time::Instant;

/// Runs tools by id. Holds the (lazily loaded) video engine, so one
/// converter should be shared by every tool view.
#[derive(Debug)]
pub struct Converter<L: EngineLoader> {
    config: ToolboxConfig,
    engine: EngineHandle<L>,
}

impl<L: EngineLoader> Converter<L> {
    #[must_use]
    pub fn new(config: ToolboxConfig, loader: L) -> Self {
        Self {
            config,
            engine: EngineHandle::new(loader),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ToolboxConfig {
        &self.config
    }

    #[must_use]
    pub const fn engine(&self) -> &EngineHandle<L> {
        &self.engine
    }

    /// Run tool `tool_id` over `file`.
    ///
    /// `on_progress` only fires for media tools, while the engine loads.
    ///
    /// # Errors
    ///
    /// - [`ToolError::UnknownTool`] if no tool has this id.
    /// - [`ToolError::FileTooLarge`] if `file` is over the size limit;
    ///   nothing else is attempted.
    /// - [`ToolError::InvalidInput`] for calculator tools, which take no
    ///   file, and for out-of-range options.
    /// - Whatever the tool's strategy reports otherwise.
    #[tracing::instrument(skip_all, fields(tool = %tool_id, file = %file.name, size = file.size()))]
    pub async fn convert(
        &self,
        file: &SelectedFile,
        tool_id: &str,
        options: &ConvertOptions,
        on_progress: Option<ProgressFn>,
    ) -> Result<ConversionResult, ToolError> {
        let tool = registry::require(tool_id)?;
        self.config.check_file_size(&file.meta())?;

        let started = Instant::now();
        let result = match tool.strategy {
            ToolStrategy::ImageConvert(format) => raster::convert_image(
                file,
                format,
                self.config.quality(options.quality),
                &self.config,
            ),
            ToolStrategy::ImageEnhance(op) => {
                enhance::enhance_image(file, op, options, &self.config)
            }
            ToolStrategy::Media(op) => self.run_media(op, file, options, on_progress).await,
            ToolStrategy::Text(op) => op.apply(file),
            ToolStrategy::Calculator => Err(ToolError::InvalidInput(format!(
                "{} does not take a file",
                tool.name
            ))),
        };

        match &result {
            Ok(output) => tracing::info!(
                elapsed = ?started.elapsed(),
                output = %output.name,
                bytes = output.bytes.len(),
                "conversion finished"
            ),
            Err(e) => tracing::warn!(elapsed = ?started.elapsed(), error = %e, "conversion failed"),
        }
        result
    }

    async fn run_media(
        &self,
        op: MediaOp,
        file: &SelectedFile,
        options: &ConvertOptions,
        on_progress: Option<ProgressFn>,
    ) -> Result<ConversionResult, ToolError> {
        // Rejected input never triggers an engine load.
        let job = build_job(op, file, options, &self.config)?;
        let engine = self.engine.acquire(on_progress).await?;
        let mut result = engine.run_command(file, &job.command).await?;
        result.name = job.display_name;
        Ok(result)
    }
}
