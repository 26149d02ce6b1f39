//! List the capture devices ffmpeg reports.

use rec_capture_engine::{CaptureSession, SessionConfig, SystemRunner};
use rec_common::config::RecConfig;
use rec_devices::{DeviceInventories, DeviceKind};

pub async fn run(config: &RecConfig, json: bool) -> anyhow::Result<()> {
    let session = CaptureSession::new(SessionConfig::from(config), SystemRunner::new());
    let inventories = session.enumerate_devices().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&inventories)?);
    } else {
        print!("{}", render(&inventories));
    }
    Ok(())
}

fn render(inventories: &DeviceInventories) -> String {
    let mut out = String::new();
    for (heading, kind) in [("Video devices:", DeviceKind::Video), ("Audio devices:", DeviceKind::Audio)] {
        out.push_str(heading);
        out.push('\n');
        let entries = inventories.get(kind);
        if entries.is_empty() {
            out.push_str("  (none found)\n");
        }
        for entry in entries {
            out.push_str(&format!("  [{}] {}\n", entry.index, entry.label));
        }
    }
    out
}
