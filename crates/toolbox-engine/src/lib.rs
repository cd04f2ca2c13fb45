//! Video engine plumbing for toolbox.
//!
//! The engine is heavy, so it is loaded at most once and only when a
//! media tool first needs it ([`EngineHandle`]). Commands against a loaded
//! engine are serialized and always clean up the files they stage
//! ([`LoadedEngine::run_command`]). [`build_job`] turns a media tool and
//! its options into the command line to run.

pub mod engine;
pub mod error;
pub mod handle;
pub mod media;
pub mod process;
pub mod progress;

pub use engine::{EngineCommand, EngineLoader, LoadedEngine, VideoEngine};
pub use error::EngineError;
pub use handle::{EngineHandle, EngineState};
pub use media::{MediaJob, build_job};
pub use process::{EngineConfig, FfmpegEngine, FfmpegLoader};
pub use progress::{ProgressFn, ProgressReporter};
