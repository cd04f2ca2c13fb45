//! Engine traits and the command runner.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use toolbox_core::{ConversionResult, SelectedFile};

use crate::error::{EngineError, validate_name};
use crate::progress::ProgressReporter;

/// A loaded transcoding engine with its own sandboxed file namespace.
///
/// Implementations are single-threaded: [`LoadedEngine`] never issues two
/// calls at once.
#[async_trait]
pub trait VideoEngine: Send + 'static {
    /// Create or replace `name` in the virtual filesystem.
    async fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError>;

    /// Run a command line and return its exit code.
    async fn exec(&mut self, args: &[String]) -> Result<i32, EngineError>;

    /// Read `name` from the virtual filesystem.
    async fn read_file(&mut self, name: &str) -> Result<Vec<u8>, EngineError>;

    /// Remove `name` from the virtual filesystem.
    async fn delete_file(&mut self, name: &str) -> Result<(), EngineError>;
}

/// Produces a ready [`VideoEngine`], reporting progress as it goes.
#[async_trait]
pub trait EngineLoader: Send + Sync + 'static {
    type Engine: VideoEngine;

    async fn load(&self, progress: &ProgressReporter) -> Result<Self::Engine, EngineError>;
}

/// One engine invocation: stage the input under `input_name`, run `args`,
/// collect `output_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineCommand {
    pub input_name: String,
    pub args: Vec<String>,
    pub output_name: String,
    pub output_mime: String,
}

/// A ready engine. Commands submitted concurrently run one after another.
pub struct LoadedEngine<E> {
    engine: Mutex<E>,
}

impl<E: VideoEngine> LoadedEngine<E> {
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    /// Run `command` over `input`.
    ///
    /// Both the staged input and the output are removed from the virtual
    /// filesystem afterwards, whether the command succeeded or not.
    /// Removal failures are logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidName`] for unusable file names,
    /// [`EngineError::ExitStatus`] when the command exits non-zero, and any
    /// error the engine reports for staging, running or reading.
    #[tracing::instrument(skip_all, fields(input = %command.input_name, output = %command.output_name))]
    pub async fn run_command(
        &self,
        input: &SelectedFile,
        command: &EngineCommand,
    ) -> Result<ConversionResult, EngineError> {
        validate_name(&command.input_name)?;
        validate_name(&command.output_name)?;
        if command.input_name == command.output_name {
            return Err(EngineError::InvalidName(command.output_name.clone()));
        }

        let mut engine = self.engine.lock().await;
        let outcome = stage_run_collect(&mut *engine, input, command).await;

        for name in [&command.input_name, &command.output_name] {
            if let Err(e) = engine.delete_file(name).await {
                tracing::debug!(file = %name, error = %e, "cleanup skipped");
            }
        }

        match &outcome {
            Ok(bytes) => tracing::debug!(bytes = bytes.len(), "command finished"),
            Err(e) => tracing::warn!(error = %e, "command failed"),
        }
        Ok(ConversionResult::new(
            outcome?,
            command.output_name.clone(),
            command.output_mime.clone(),
        ))
    }
}

async fn stage_run_collect<E: VideoEngine>(
    engine: &mut E,
    input: &SelectedFile,
    command: &EngineCommand,
) -> Result<Vec<u8>, EngineError> {
    engine.write_file(&command.input_name, &input.bytes).await?;
    let code = engine.exec(&command.args).await?;
    if code != 0 {
        return Err(EngineError::ExitStatus { code });
    }
    engine.read_file(&command.output_name).await
}

impl<E> std::fmt::Debug for LoadedEngine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedEngine").finish_non_exhaustive()
    }
}
