//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RecError, RecResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecConfig {
    /// How the capture tool is invoked.
    pub ffmpeg: FfmpegConfig,

    /// Where recordings are written and how they are named.
    pub output: OutputConfig,

    /// Which device kind the operator picks first.
    pub selection_order: SelectionOrder,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Capture tool invocation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    /// Program name or path of the ffmpeg binary.
    pub program: String,

    /// Capture framework passed to `-f`.
    pub input_format: String,
}

/// Recording destination settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory recordings are written to.
    pub dir: PathBuf,

    /// File name prefix placed before the unique id.
    pub prefix: String,

    /// File extension without the leading dot.
    pub extension: String,
}

/// Order in which the two device pickers are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    #[default]
    AudioFirst,
    VideoFirst,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "rec_devices=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            input_format: "avfoundation".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            prefix: "recout-".to_string(),
            extension: "mkv".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl RecConfig {
    /// Load config from the standard location, falling back to defaults.
    ///
    /// A file that exists but cannot be used is handed back as the second
    /// value so the caller can report it once logging is set up.
    pub fn load() -> (Self, Option<RecError>) {
        Self::load_or_default(&config_file_path())
    }

    /// Like [`RecConfig::load_from`], but an unusable file yields the
    /// defaults together with the reason it was ignored.
    pub fn load_or_default(path: &Path) -> (Self, Option<RecError>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load config from `path`. A missing file gives the defaults; an
    /// unreadable or malformed one is a [`RecError::Config`].
    pub fn load_from(path: &Path) -> RecResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| RecError::config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| RecError::config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Save config to the standard location and return where it went.
    pub fn save(&self) -> RecResult<PathBuf> {
        let path = config_file_path();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config as pretty JSON to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> RecResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values that would produce an unusable command line.
    pub fn validate(&self) -> RecResult<()> {
        if self.ffmpeg.program.trim().is_empty() {
            return Err(RecError::config("ffmpeg.program must not be empty"));
        }
        if self.ffmpeg.input_format.trim().is_empty() {
            return Err(RecError::config("ffmpeg.input_format must not be empty"));
        }
        if self.output.extension.trim().is_empty() {
            return Err(RecError::config("output.extension must not be empty"));
        }
        if self.output.prefix.contains(std::path::MAIN_SEPARATOR) {
            return Err(RecError::config(
                "output.prefix must not contain a path separator; use output.dir",
            ));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("rec").join("config.json")
}
