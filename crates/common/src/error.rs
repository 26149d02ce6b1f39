//! Error types shared across rec crates.

/// Top-level error type for rec operations.
#[derive(Debug, thiserror::Error)]
pub enum RecError {
    #[error("Device list parse error: {message}")]
    Parse { message: String },

    #[error("Picker rendering error: {message}")]
    Rendering { message: String },

    #[error("Subprocess error: {message}")]
    Subprocess { message: String },

    #[error("Recording failed (dev={locator:?}, out={output:?}): {message}")]
    Recording {
        locator: String,
        output: String,
        message: String,
    },

    #[error("No {kind} devices reported by the capture tool")]
    EmptyInventory { kind: String },

    #[error("Selection of {kind} device cancelled")]
    SelectionCancelled { kind: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using RecError.
pub type RecResult<T> = Result<T, RecError>;

impl RecError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    pub fn rendering(msg: impl Into<String>) -> Self {
        Self::Rendering {
            message: msg.into(),
        }
    }

    pub fn subprocess(msg: impl Into<String>) -> Self {
        Self::Subprocess {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn recording(
        locator: impl Into<String>,
        output: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Recording {
            locator: locator.into(),
            output: output.into(),
            message: msg.into(),
        }
    }

    /// Whether the operator aborted the run rather than something failing.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::SelectionCancelled { .. })
    }
}
