//! Parser for the capture tool's device listing.
//!
//! The listing is diagnostic output, not a stable format. Lines carrying
//! [`SECTION_MARKER`] either open a section (`... video devices:` /
//! `... audio devices:`) or describe one device as `[<index>] <label>`.
//! The scan is a fold over the lines with the current [`ParseSection`]
//! threaded through; any malformed marker line fails the whole parse.

use rec_common::error::RecError;

use crate::inventory::{DeviceEntry, DeviceInventories, DeviceKind};

/// Substring every line the capture framework prints about devices carries.
pub const SECTION_MARKER: &str = "AVFoundation indev @";

const VIDEO_HEADER: &str = "video devices";
const AUDIO_HEADER: &str = "audio devices";

/// Reasons a device listing cannot be turned into inventories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("line {line_no}: malformed device line {line:?}")]
    MalformedDeviceLine { line_no: usize, line: String },

    #[error("line {line_no}: device index {digits:?} is not a valid index")]
    DeviceIndexFormat { line_no: usize, digits: String },
}

impl From<InventoryError> for RecError {
    fn from(err: InventoryError) -> Self {
        RecError::parse(err.to_string())
    }
}

/// Which inventory device lines are currently appended to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseSection {
    /// No header seen yet; device lines are dropped.
    #[default]
    Start,
    Video,
    Audio,
}

impl ParseSection {
    fn kind(self) -> Option<DeviceKind> {
        match self {
            Self::Start => None,
            Self::Video => Some(DeviceKind::Video),
            Self::Audio => Some(DeviceKind::Audio),
        }
    }
}

/// Parse a complete device listing into `(audio, video)` inventories.
///
/// Pure function of `text`. Entry order follows the input; indices are
/// neither sorted nor deduplicated.
pub fn parse_device_list(text: &str) -> Result<DeviceInventories, InventoryError> {
    let state = text
        .lines()
        .enumerate()
        .try_fold(ScanState::default(), |state, (idx, line)| {
            state.feed(idx + 1, line)
        })?;

    tracing::debug!(
        audio = state.inventories.audio.len(),
        video = state.inventories.video.len(),
        "Parsed device list"
    );
    Ok(state.inventories)
}

#[derive(Debug, Default)]
struct ScanState {
    section: ParseSection,
    inventories: DeviceInventories,
}

enum LineClass<'a> {
    Header(ParseSection),
    /// Marker line that is not a header; the text after the marker.
    Device(&'a str),
    /// Line without the marker.
    Unmarked(&'a str),
}

fn classify(line: &str) -> LineClass<'_> {
    match line.find(SECTION_MARKER) {
        Some(pos) => {
            if line.contains(VIDEO_HEADER) {
                LineClass::Header(ParseSection::Video)
            } else if line.contains(AUDIO_HEADER) {
                LineClass::Header(ParseSection::Audio)
            } else {
                LineClass::Device(&line[pos + SECTION_MARKER.len()..])
            }
        }
        None => LineClass::Unmarked(line),
    }
}

impl ScanState {
    fn feed(mut self, line_no: usize, line: &str) -> Result<Self, InventoryError> {
        match classify(line) {
            LineClass::Header(section) => {
                tracing::debug!(line_no, ?section, "Device section starts");
                self.section = section;
            }
            LineClass::Device(rest) => {
                let (digits, label) =
                    find_entry(rest).ok_or_else(|| InventoryError::MalformedDeviceLine {
                        line_no,
                        line: line.to_string(),
                    })?;
                let entry = build_entry(line_no, digits, label)?;
                self.append(line_no, entry);
            }
            // Bare `[n] label` lines continue an open section; any other
            // unmarked output is tool chatter.
            LineClass::Unmarked(text) => {
                if self.section != ParseSection::Start {
                    if let Some((digits, label)) = match_entry_at(text.trim_start()) {
                        let entry = build_entry(line_no, digits, label)?;
                        self.append(line_no, entry);
                    }
                }
            }
        }
        Ok(self)
    }

    fn append(&mut self, line_no: usize, entry: DeviceEntry) {
        match self.section.kind() {
            Some(kind) => {
                tracing::trace!(line_no, %kind, index = entry.index, label = %entry.label, "Device");
                self.inventories.push(kind, entry);
            }
            None => {
                tracing::debug!(line_no, index = entry.index, "Device line before any section, dropped");
            }
        }
    }
}

fn build_entry(line_no: usize, digits: &str, label: &str) -> Result<DeviceEntry, InventoryError> {
    let index = digits
        .parse::<u32>()
        .map_err(|_| InventoryError::DeviceIndexFormat {
            line_no,
            digits: digits.to_string(),
        })?;
    Ok(DeviceEntry::new(index, label.trim()))
}

/// Leftmost `[<digits>] <label>` in `text`.
fn find_entry(text: &str) -> Option<(&str, &str)> {
    text.match_indices('[')
        .find_map(|(pos, _)| match_entry_at(&text[pos..]))
}

/// `[<digits>] <label>` anchored at the start of `text`.
fn match_entry_at(text: &str) -> Option<(&str, &str)> {
    let inner = text.strip_prefix('[')?;
    let close = inner.find(']')?;
    let digits = &inner[..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let label = inner[close + 1..].strip_prefix(' ')?;
    Some((digits, label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LISTING: &str = "\
[AVFoundation indev @ 0x7f9c1a604080] AVFoundation video devices:
[AVFoundation indev @ 0x7f9c1a604080] [0] FaceTime HD Camera
[AVFoundation indev @ 0x7f9c1a604080] [1] Capture screen 0
[AVFoundation indev @ 0x7f9c1a604080] AVFoundation audio devices:
[AVFoundation indev @ 0x7f9c1a604080] [0] MacBook Pro Microphone
[in#0 @ 0x7f9c1a504340] Error opening input: Input/output error
";

    fn marked(index: u32, label: &str) -> String {
        format!("[AVFoundation indev @ 0x7f9c1a604080] [{index}] {label}")
    }

    #[test]
    fn test_parses_both_sections_in_order() {
        let inv = parse_device_list(LISTING).unwrap();
        assert_eq!(
            inv.video,
            vec![
                DeviceEntry::new(0, "FaceTime HD Camera"),
                DeviceEntry::new(1, "Capture screen 0"),
            ]
        );
        assert_eq!(inv.audio, vec![DeviceEntry::new(0, "MacBook Pro Microphone")]);
    }

    #[test]
    fn test_end_to_end_listing_without_markers_on_device_lines() {
        let text = "... AVFoundation indev @ ... video devices:\n[0] Capture screen\n[1] USB Camera\nAVFoundation indev @ ... audio devices:\n[0] Built-in Microphone\n";
        let inv = parse_device_list(text).unwrap();
        assert_eq!(
            inv.video,
            vec![
                DeviceEntry::new(0, "Capture screen"),
                DeviceEntry::new(1, "USB Camera"),
            ]
        );
        assert_eq!(inv.audio, vec![DeviceEntry::new(0, "Built-in Microphone")]);
    }

    #[test]
    fn test_device_before_header_is_dropped() {
        let text = format!(
            "{}\n[AVFoundation indev @ 0x1] AVFoundation audio devices:\n{}\n",
            marked(4, "Early"),
            marked(0, "Mic")
        );
        let inv = parse_device_list(&text).unwrap();
        assert!(inv.video.is_empty());
        assert_eq!(inv.audio, vec![DeviceEntry::new(0, "Mic")]);
    }

    #[test]
    fn test_unmarked_lines_before_header_are_ignored() {
        let inv = parse_device_list("[0] Stray\nffmpeg version 6.1\n").unwrap();
        assert!(inv.is_empty());
    }

    #[test]
    fn test_malformed_marker_line_fails_whole_parse() {
        let text = format!(
            "[AVFoundation indev @ 0x1] AVFoundation video devices:\n{}\n[AVFoundation indev @ 0x1] something odd\n",
            marked(0, "Camera")
        );
        let err = parse_device_list(&text).unwrap_err();
        assert_eq!(
            err,
            InventoryError::MalformedDeviceLine {
                line_no: 3,
                line: "[AVFoundation indev @ 0x1] something odd".to_string(),
            }
        );
    }

    #[test]
    fn test_non_numeric_bracket_is_malformed() {
        let text = "[AVFoundation indev @ 0x1] AVFoundation video devices:\n[AVFoundation indev @ 0x1] [a] Camera\n";
        assert!(matches!(
            parse_device_list(text),
            Err(InventoryError::MalformedDeviceLine { line_no: 2, .. })
        ));
    }

    #[test]
    fn test_overflowing_index_is_index_format_error() {
        let text = format!(
            "[AVFoundation indev @ 0x1] AVFoundation video devices:\n{}\n",
            "[AVFoundation indev @ 0x1] [99999999999] Camera"
        );
        assert_eq!(
            parse_device_list(&text).unwrap_err(),
            InventoryError::DeviceIndexFormat {
                line_no: 2,
                digits: "99999999999".to_string(),
            }
        );
    }

    #[test]
    fn test_multi_digit_and_duplicate_indices_are_kept() {
        let text = format!(
            "[AVFoundation indev @ 0x1] AVFoundation video devices:\n{}\n{}\n{}\n",
            marked(12, "Virtual Cam"),
            marked(3, "Camera"),
            marked(12, "Virtual Cam")
        );
        let inv = parse_device_list(&text).unwrap();
        let indices: Vec<u32> = inv.video.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![12, 3, 12]);
    }

    #[test]
    fn test_label_is_trimmed_and_may_contain_brackets() {
        let text = format!(
            "[AVFoundation indev @ 0x1] AVFoundation audio devices:\n{}\n",
            marked(2, "ZoomAudioDevice [virtual]   ")
        );
        let inv = parse_device_list(&text).unwrap();
        assert_eq!(inv.audio[0].label, "ZoomAudioDevice [virtual]");
    }

    #[test]
    fn test_crlf_listing() {
        let text = LISTING.replace('\n', "\r\n");
        assert_eq!(parse_device_list(&text).unwrap(), parse_device_list(LISTING).unwrap());
    }

    #[test]
    fn test_parse_error_converts_to_rec_error() {
        let err: RecError = InventoryError::MalformedDeviceLine {
            line_no: 7,
            line: "x".to_string(),
        }
        .into();
        assert!(matches!(err, RecError::Parse { .. }));
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn test_match_entry_requires_space_after_bracket() {
        assert_eq!(match_entry_at("[0] Cam"), Some(("0", "Cam")));
        assert_eq!(match_entry_at("[0]Cam"), None);
        assert_eq!(match_entry_at("[] Cam"), None);
        assert_eq!(find_entry(" 0x1] [5] Cam"), Some(("5", "Cam")));
    }

    fn device_strategy() -> impl Strategy<Value = (bool, u32, String)> {
        (
            any::<bool>(),
            0u32..10_000,
            "[A-Za-z0-9][A-Za-z0-9 ()-]{0,20}[A-Za-z0-9]",
        )
    }

    fn render(devices: &[(bool, u32, String)]) -> String {
        let mut out = String::from("ffmpeg version 6.1 Copyright (c) 2000-2023\n");
        let mut current: Option<bool> = None;
        for (is_video, index, label) in devices {
            if current != Some(*is_video) {
                let header = if *is_video { "video" } else { "audio" };
                out.push_str(&format!(
                    "[AVFoundation indev @ 0x7f] AVFoundation {header} devices:\n"
                ));
                current = Some(*is_video);
            }
            out.push_str(&marked(*index, label));
            out.push('\n');
        }
        out
    }

    proptest! {
        #[test]
        fn prop_every_bracketed_line_lands_in_its_section(
            devices in proptest::collection::vec(device_strategy(), 0..40)
        ) {
            let inv = parse_device_list(&render(&devices)).unwrap();
            prop_assert_eq!(inv.len(), devices.len());

            let expected_video: Vec<DeviceEntry> = devices
                .iter()
                .filter(|(v, _, _)| *v)
                .map(|(_, i, l)| DeviceEntry::new(*i, l.as_str()))
                .collect();
            let expected_audio: Vec<DeviceEntry> = devices
                .iter()
                .filter(|(v, _, _)| !*v)
                .map(|(_, i, l)| DeviceEntry::new(*i, l.as_str()))
                .collect();
            prop_assert_eq!(inv.video, expected_video);
            prop_assert_eq!(inv.audio, expected_audio);
        }

        #[test]
        fn prop_parse_is_deterministic(
            devices in proptest::collection::vec(device_strategy(), 0..20)
        ) {
            let text = render(&devices);
            prop_assert_eq!(parse_device_list(&text), parse_device_list(&text));
        }
    }
}
