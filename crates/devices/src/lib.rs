//! rec Device Inventory
//!
//! Turns the free-form diagnostic text the capture tool prints when asked to
//! list its devices into two ordered inventories, one per device kind.
//!
//! ```text
//! [AVFoundation indev @ 0x7f..] AVFoundation video devices:   -> section = Video
//! [AVFoundation indev @ 0x7f..] [0] FaceTime HD Camera         -> video[0]
//! [AVFoundation indev @ 0x7f..] AVFoundation audio devices:   -> section = Audio
//! [AVFoundation indev @ 0x7f..] [0] MacBook Pro Microphone     -> audio[0]
//! ```

pub mod inventory;
pub mod parser;

pub use inventory::*;
pub use parser::{parse_device_list, InventoryError, ParseSection, SECTION_MARKER};
