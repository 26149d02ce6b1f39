//! Device locator and output file naming.

use serde::Serialize;
use std::fmt;

use rec_devices::DeviceEntry;

/// Which devices ffmpeg captures from, written `"<video>:<audio>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureLocator {
    pub video: u32,
    pub audio: u32,
}

impl CaptureLocator {
    /// Build from the tool-assigned indices of the chosen entries.
    pub fn from_entries(video: &DeviceEntry, audio: &DeviceEntry) -> Self {
        Self {
            video: video.index,
            audio: audio.index,
        }
    }
}

impl fmt::Display for CaptureLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.video, self.audio)
    }
}

/// Recording file name: prefix, a fresh v4 UUID, then the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputName {
    prefix: String,
    id: uuid::Uuid,
    extension: String,
}

impl OutputName {
    /// A new name with a never-before-used id.
    pub fn generate(prefix: &str, extension: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            id: uuid::Uuid::new_v4(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.id
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}.{}", self.prefix, self.id, self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_is_video_first() {
        let video = DeviceEntry::new(1, "USB Camera");
        let audio = DeviceEntry::new(0, "Built-in Microphone");
        assert_eq!(CaptureLocator::from_entries(&video, &audio).to_string(), "1:0");
    }

    #[test]
    fn test_locator_uses_indices_not_positions() {
        let video = DeviceEntry::new(7, "Capture screen 1");
        let audio = DeviceEntry::new(12, "Loopback");
        assert_eq!(CaptureLocator::from_entries(&video, &audio).to_string(), "7:12");
    }

    #[test]
    fn test_output_name_shape() {
        let name = OutputName::generate("recout-", "mkv").to_string();
        assert!(name.starts_with("recout-"));
        assert!(name.ends_with(".mkv"));
        let id = &name["recout-".len()..name.len() - ".mkv".len()];
        assert_eq!(uuid::Uuid::parse_str(id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_output_names_are_unique() {
        let a = OutputName::generate("recout-", "mkv");
        let b = OutputName::generate("recout-", "mkv");
        assert_ne!(a.id(), b.id());
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_extension_leading_dot_is_tolerated() {
        let name = OutputName::generate("cap-", ".mov").to_string();
        assert!(name.ends_with(".mov"));
        assert!(!name.ends_with("..mov"));
    }
}
