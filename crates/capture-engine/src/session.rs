//! Capture run orchestration.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::runtime::{Handle, RuntimeFlavor};

use rec_common::config::{RecConfig, SelectionOrder};
use rec_common::error::{RecError, RecResult};
use rec_devices::{parse_device_list, DeviceEntry, DeviceInventories, DeviceKind};
use rec_picker::{run_picker, PickerSurface, Selection};

use crate::naming::{CaptureLocator, OutputName};
use crate::tool::{Invocation, ToolRunner};

/// Settings for one capture run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// ffmpeg program name or path.
    pub program: String,

    /// Capture framework passed to `-f`.
    pub input_format: String,

    /// Directory the recording is written to.
    pub output_dir: PathBuf,

    /// File name prefix before the unique id.
    pub output_prefix: String,

    /// File extension without the dot.
    pub output_extension: String,

    /// Which picker is shown first.
    pub selection_order: SelectionOrder,
}

impl From<&RecConfig> for SessionConfig {
    fn from(config: &RecConfig) -> Self {
        Self {
            program: config.ffmpeg.program.clone(),
            input_format: config.ffmpeg.input_format.clone(),
            output_dir: config.output.dir.clone(),
            output_prefix: config.output.prefix.clone(),
            output_extension: config.output.extension.clone(),
            selection_order: config.selection_order,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&RecConfig::default())
    }
}

/// The operator's chosen devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePair {
    pub audio: DeviceEntry,
    pub video: DeviceEntry,
}

impl DevicePair {
    pub fn locator(&self) -> CaptureLocator {
        CaptureLocator::from_entries(&self.video, &self.audio)
    }
}

/// A recording that ran to completion.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingOutcome {
    pub locator: CaptureLocator,
    pub output: PathBuf,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// One enumerate → pick → record run against ffmpeg.
pub struct CaptureSession<R> {
    config: SessionConfig,
    runner: R,
}

impl<R: ToolRunner> CaptureSession<R> {
    pub fn new(config: SessionConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// `ffmpeg -f <fmt> -list_devices true -i ""`
    pub fn enumeration_invocation(&self) -> Invocation {
        Invocation::new(
            &self.config.program,
            ["-f", self.config.input_format.as_str(), "-list_devices", "true", "-i", ""],
        )
    }

    /// `ffmpeg -f <fmt> -i <video>:<audio> <output>`
    ///
    /// `output` is passed as given; see [`CaptureSession::output_path`].
    pub fn recording_invocation(&self, locator: &CaptureLocator, output: &Path) -> Invocation {
        Invocation::new(
            &self.config.program,
            [
                "-f".to_string(),
                self.config.input_format.clone(),
                "-i".to_string(),
                locator.to_string(),
                output.display().to_string(),
            ],
        )
    }

    /// Where a recording named `name` is written. With the default output
    /// directory `.` this is the bare file name.
    pub fn output_path(&self, name: &OutputName) -> PathBuf {
        if self.config.output_dir == Path::new(".") {
            PathBuf::from(name.to_string())
        } else {
            self.config.output_dir.join(name.to_string())
        }
    }

    /// Run the whole capture flow: enumerate, pick both devices, record.
    ///
    /// Picking blocks on operator input. On a multi-threaded runtime the
    /// worker is handed off for the duration of each picker session.
    pub async fn run<S>(&self, surface: &mut S) -> RecResult<RecordingOutcome>
    where
        S: PickerSurface + ?Sized,
    {
        let inventories = self.enumerate_devices().await?;
        let pair = blocking(|| self.select_devices(&inventories, surface))?;
        self.record(&pair).await
    }

    /// Ask the capture tool for its devices and parse the listing.
    ///
    /// The tool exits non-zero after listing since no real input is given;
    /// only failing to launch it is an error.
    pub async fn enumerate_devices(&self) -> RecResult<DeviceInventories> {
        let invocation = self.enumeration_invocation();
        let captured = self.runner.capture(&invocation).await?;
        tracing::debug!(
            code = ?captured.exit.code,
            bytes = captured.text.len(),
            "Device listing captured"
        );

        let inventories = parse_device_list(&captured.text)?;
        tracing::info!(
            audio = inventories.audio.len(),
            video = inventories.video.len(),
            "Devices enumerated"
        );
        Ok(inventories)
    }

    /// Run one picker per device kind in the configured order.
    pub fn select_devices<S>(
        &self,
        inventories: &DeviceInventories,
        surface: &mut S,
    ) -> RecResult<DevicePair>
    where
        S: PickerSurface + ?Sized,
    {
        for kind in [DeviceKind::Audio, DeviceKind::Video] {
            if inventories.get(kind).is_empty() {
                return Err(RecError::EmptyInventory {
                    kind: kind.to_string(),
                });
            }
        }

        let pair = match self.config.selection_order {
            SelectionOrder::AudioFirst => {
                let audio = pick(&mut *surface, DeviceKind::Audio, inventories)?;
                let video = pick(&mut *surface, DeviceKind::Video, inventories)?;
                DevicePair { audio, video }
            }
            SelectionOrder::VideoFirst => {
                let video = pick(&mut *surface, DeviceKind::Video, inventories)?;
                let audio = pick(&mut *surface, DeviceKind::Audio, inventories)?;
                DevicePair { audio, video }
            }
        };
        Ok(pair)
    }

    /// Record from `pair` into a freshly named file and wait for ffmpeg.
    pub async fn record(&self, pair: &DevicePair) -> RecResult<RecordingOutcome> {
        let locator = pair.locator();
        let name = OutputName::generate(&self.config.output_prefix, &self.config.output_extension);
        let output = self.output_path(&name);
        let recording_error =
            |msg: String| RecError::recording(locator.to_string(), output.display().to_string(), msg);

        tokio::fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| recording_error(format!("cannot create output directory: {e}")))?;

        let invocation = self.recording_invocation(&locator, &output);
        tracing::info!(dev = %locator, out = %output.display(), "Starting recording");

        let started_at = Utc::now();
        let clock = Instant::now();
        let exit = self
            .runner
            .run_attached(&invocation)
            .await
            .map_err(|e| recording_error(e.to_string()))?;

        if !exit.success {
            return Err(recording_error(format!("{} reported {exit}", self.config.program)));
        }

        let elapsed = clock.elapsed();
        tracing::info!(
            dev = %locator,
            out = %output.display(),
            elapsed_secs = elapsed.as_secs_f64(),
            "Recording finished"
        );
        Ok(RecordingOutcome {
            locator,
            output,
            started_at,
            elapsed,
        })
    }

    /// First line of `ffmpeg -version`, for capability checks.
    pub async fn tool_version(&self) -> RecResult<String> {
        let invocation = Invocation::new(&self.config.program, ["-version"]);
        let captured = self.runner.capture(&invocation).await?;
        if !captured.exit.success {
            return Err(RecError::subprocess(format!(
                "`{invocation}` reported {}",
                captured.exit
            )));
        }
        Ok(captured.text.lines().next().unwrap_or_default().trim().to_string())
    }
}

fn pick<S>(
    surface: &mut S,
    kind: DeviceKind,
    inventories: &DeviceInventories,
) -> RecResult<DeviceEntry>
where
    S: PickerSurface + ?Sized,
{
    let title = format!("Select {kind} device");
    match run_picker(surface, &title, inventories.get(kind))? {
        Selection::Confirmed(entry) => {
            tracing::info!(%kind, index = entry.index, label = %entry.label, "Device selected");
            Ok(entry.clone())
        }
        Selection::Cancelled => Err(RecError::SelectionCancelled {
            kind: kind.to_string(),
        }),
    }
}

fn blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current().map(|handle| handle.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(f),
        _ => f(),
    }
}
