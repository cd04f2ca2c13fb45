//! Engine errors.

use toolbox_core::ToolError;

/// Errors raised while loading the engine or running a command.
///
/// `Clone` so one failed load can be handed to every caller that was
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The engine could not be initialized.
    #[error("engine load failed: {0}")]
    Load(String),

    /// The command ran and exited unsuccessfully.
    #[error("command exited with status {code}")]
    ExitStatus {
        /// Exit code reported by the engine.
        code: i32,
    },

    /// The command could not be started or did not produce its output.
    #[error("command failed: {0}")]
    Command(String),

    /// A virtual filesystem operation failed.
    #[error("virtual filesystem error on {name:?}: {message}")]
    Filesystem {
        /// Entry the operation targeted.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// A virtual filesystem name is not a plain file name.
    #[error("invalid virtual file name: {0:?}")]
    InvalidName(String),
}

impl From<EngineError> for ToolError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Load(msg) => Self::EngineLoad(msg),
            other => Self::EngineCommand(other.to_string()),
        }
    }
}

/// Check that `name` is a plain file name usable in the virtual
/// filesystem: non-empty, no path separators, not `.`/`..`, and not
/// starting with `-` (it would read as a flag on the command line).
///
/// # Errors
///
/// Returns [`EngineError::InvalidName`] otherwise.
pub fn validate_name(name: &str) -> Result<(), EngineError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.starts_with('-')
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(EngineError::InvalidName(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_maps_to_engine_load() {
        let err: ToolError = EngineError::Load("no wasm".into()).into();
        assert_eq!(err, ToolError::EngineLoad("no wasm".into()));
    }

    #[test]
    fn everything_else_maps_to_engine_command() {
        let err: ToolError = EngineError::ExitStatus { code: 1 }.into();
        assert!(matches!(err, ToolError::EngineCommand(_)));
    }

    #[test]
    fn names() {
        assert!(validate_name("input.mp4").is_ok());
        for bad in ["", ".", "..", "-y", "a/b", "a\\b", "../etc"] {
            assert!(validate_name(bad).is_err(), "{bad:?}");
        }
    }
}
