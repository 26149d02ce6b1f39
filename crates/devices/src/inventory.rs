//! Device inventory data model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One capture device as reported by the capture tool.
///
/// `index` is the tool-assigned identifier passed back to it when recording.
/// It is not a position in any list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub index: u32,
    pub label: String,
}

impl DeviceEntry {
    pub fn new(index: u32, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }
}

impl fmt::Display for DeviceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {}", self.index, self.label)
    }
}

/// Category a device is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Audio,
    Video,
}

impl DeviceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two inventories produced from one device listing.
///
/// Entries keep the order they were printed in. Duplicate indices are kept
/// as reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInventories {
    pub audio: Vec<DeviceEntry>,
    pub video: Vec<DeviceEntry>,
}

impl DeviceInventories {
    /// Entries listed under `kind`.
    pub fn get(&self, kind: DeviceKind) -> &[DeviceEntry] {
        match kind {
            DeviceKind::Audio => &self.audio,
            DeviceKind::Video => &self.video,
        }
    }

    pub(crate) fn push(&mut self, kind: DeviceKind, entry: DeviceEntry) {
        match kind {
            DeviceKind::Audio => self.audio.push(entry),
            DeviceKind::Video => self.video.push(entry),
        }
    }

    /// Total number of entries across both kinds.
    pub fn len(&self) -> usize {
        self.audio.len() + self.video.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty() && self.video.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_display_matches_picker_line() {
        let entry = DeviceEntry::new(3, "USB Camera");
        assert_eq!(entry.to_string(), "3 > USB Camera");
    }

    #[test]
    fn test_get_by_kind() {
        let mut inv = DeviceInventories::default();
        inv.push(DeviceKind::Video, DeviceEntry::new(1, "Capture screen 0"));
        inv.push(DeviceKind::Audio, DeviceEntry::new(0, "Built-in Microphone"));

        assert_eq!(inv.get(DeviceKind::Video)[0].index, 1);
        assert_eq!(inv.get(DeviceKind::Audio)[0].label, "Built-in Microphone");
        assert_eq!(inv.len(), 2);
        assert!(!inv.is_empty());
    }

    #[test]
    fn test_inventory_serialization_shape() {
        let mut inv = DeviceInventories::default();
        inv.push(DeviceKind::Audio, DeviceEntry::new(0, "Mic"));
        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(json["audio"][0]["index"], 0);
        assert_eq!(json["audio"][0]["label"], "Mic");
        assert!(json["video"].as_array().unwrap().is_empty());
    }
}
