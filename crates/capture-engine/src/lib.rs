//! rec Capture Engine
//!
//! Drives one capture run from device discovery to a finished recording.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   CaptureSession                      │
//! │                                                      │
//! │  ffmpeg -list_devices ──▶ parse_device_list          │
//! │                               │                      │
//! │                 ┌─────────────┴────────────┐         │
//! │                 ▼                          ▼         │
//! │         run_picker(audio)          run_picker(video) │
//! │                 └─────────────┬────────────┘         │
//! │                               ▼                      │
//! │        CaptureLocator "<v>:<a>" + OutputName         │
//! │                               ▼                      │
//! │              ffmpeg -i <v>:<a> recout-<id>.mkv       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! External programs are reached only through [`ToolRunner`], so the whole
//! run can be exercised without ffmpeg or a terminal.

pub mod naming;
pub mod session;
pub mod tool;

pub use naming::*;
pub use session::*;
pub use tool::*;
