//! Native engine backed by an `ffmpeg` executable.
//!
//! The virtual filesystem is a private scratch directory; commands run
//! with it as working directory, so staged names resolve inside it.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use crate::engine::{EngineLoader, VideoEngine};
use crate::error::{EngineError, validate_name};
use crate::progress::ProgressReporter;

/// Settings for the native engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Executable to run; looked up on `PATH` when not absolute.
    pub ffmpeg_path: PathBuf,
    /// Parent directory for scratch directories (system temp dir when unset).
    pub scratch_dir: Option<PathBuf>,
}

impl EngineConfig {
    pub const DEFAULT_FFMPEG: &'static str = "ffmpeg";
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from(Self::DEFAULT_FFMPEG),
            scratch_dir: None,
        }
    }
}

/// Loads an [`FfmpegEngine`]: probes the executable, then creates the
/// scratch directory.
#[derive(Debug, Clone, Default)]
pub struct FfmpegLoader {
    config: EngineConfig,
}

impl FfmpegLoader {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EngineLoader for FfmpegLoader {
    type Engine = FfmpegEngine;

    async fn load(&self, progress: &ProgressReporter) -> Result<FfmpegEngine, EngineError> {
        progress.report(0.0);
        let output = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                EngineError::Load(format!(
                    "cannot run {}: {e}",
                    self.config.ffmpeg_path.display()
                ))
            })?;
        if !output.status.success() {
            return Err(EngineError::Load(format!(
                "{} -version exited with {}",
                self.config.ffmpeg_path.display(),
                output.status
            )));
        }
        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_owned();
        tracing::info!(%version, "ffmpeg found");
        progress.report(0.6);

        let mut builder = tempfile::Builder::new();
        builder.prefix("toolbox-engine-");
        let scratch = match &self.config.scratch_dir {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| EngineError::Load(format!("cannot create scratch directory: {e}")))?;
        progress.report(0.9);

        Ok(FfmpegEngine {
            binary: self.config.ffmpeg_path.clone(),
            scratch,
            version,
        })
    }
}

/// A probed `ffmpeg` executable plus its scratch directory. The directory
/// is removed when the engine is dropped.
#[derive(Debug)]
pub struct FfmpegEngine {
    binary: PathBuf,
    scratch: tempfile::TempDir,
    version: String,
}

impl FfmpegEngine {
    /// First line of `ffmpeg -version`.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Directory backing the virtual filesystem.
    #[must_use]
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    fn entry(&self, name: &str) -> Result<PathBuf, EngineError> {
        validate_name(name)?;
        Ok(self.scratch.path().join(name))
    }
}

fn fs_error(name: &str, err: &std::io::Error) -> EngineError {
    EngineError::Filesystem {
        name: name.to_owned(),
        message: err.to_string(),
    }
}

#[async_trait]
impl VideoEngine for FfmpegEngine {
    async fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError> {
        let path = self.entry(name)?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| fs_error(name, &e))
    }

    async fn exec(&mut self, args: &[String]) -> Result<i32, EngineError> {
        tracing::debug!(?args, "running ffmpeg");
        let output = Command::new(&self.binary)
            .args(["-hide_banner", "-loglevel", "error", "-nostdin", "-y"])
            .args(args)
            .current_dir(self.scratch.path())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| EngineError::Command(format!("cannot start {}: {e}", self.binary.display())))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(stderr = %stderr.trim(), "ffmpeg diagnostics");
        }
        // Killed by a signal: no code.
        Ok(output.status.code().unwrap_or(-1))
    }

    async fn read_file(&mut self, name: &str) -> Result<Vec<u8>, EngineError> {
        let path = self.entry(name)?;
        tokio::fs::read(&path).await.map_err(|e| fs_error(name, &e))
    }

    async fn delete_file(&mut self, name: &str) -> Result<(), EngineError> {
        let path = self.entry(name)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| fs_error(name, &e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn engine_in_tempdir() -> FfmpegEngine {
        FfmpegEngine {
            binary: PathBuf::from("ffmpeg"),
            scratch: tempfile::tempdir().unwrap(),
            version: String::new(),
        }
    }

    #[tokio::test]
    async fn scratch_dir_acts_as_virtual_filesystem() {
        let mut engine = engine_in_tempdir();
        engine.write_file("input.txt", b"hello").await.unwrap();
        assert!(engine.scratch_dir().join("input.txt").exists());
        assert_eq!(engine.read_file("input.txt").await.unwrap(), b"hello");
        engine.delete_file("input.txt").await.unwrap();
        assert!(!engine.scratch_dir().join("input.txt").exists());
    }

    #[tokio::test]
    async fn names_cannot_escape_scratch_dir() {
        let mut engine = engine_in_tempdir();
        let err = engine.write_file("../escape", b"x").await.unwrap_err();
        assert_eq!(err, EngineError::InvalidName("../escape".into()));
    }

    #[tokio::test]
    async fn missing_file_is_filesystem_error() {
        let mut engine = engine_in_tempdir();
        assert!(matches!(
            engine.read_file("nothing.mp4").await,
            Err(EngineError::Filesystem { .. })
        ));
    }

    #[tokio::test]
    async fn missing_binary_fails_to_load() {
        let loader = FfmpegLoader::new(EngineConfig {
            ffmpeg_path: PathBuf::from("/nonexistent/toolbox-test-ffmpeg"),
            scratch_dir: None,
        });
        let result = loader.load(&ProgressReporter::new()).await;
        assert!(matches!(result, Err(EngineError::Load(_))));
    }
}
