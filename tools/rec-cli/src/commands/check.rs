//! Check system capabilities.

use rec_capture_engine::{CaptureSession, SessionConfig, SystemRunner};
use rec_common::config::RecConfig;

pub async fn run(config: &RecConfig) -> anyhow::Result<()> {
    println!("rec System Check");
    println!("{}", "=".repeat(50));

    let session = CaptureSession::new(SessionConfig::from(config), SystemRunner::new());

    match session.tool_version().await {
        Ok(version) => println!("[OK] {}: {version}", config.ffmpeg.program),
        Err(e) => {
            println!("[MISSING - REQUIRED] {}: {e}", config.ffmpeg.program);
            println!("    Fix: install ffmpeg (e.g. brew install ffmpeg) or pass --ffmpeg <path>");
            println!();
            println!("rec cannot record until ffmpeg is available.");
            return Ok(());
        }
    }

    let ready = match session.enumerate_devices().await {
        Ok(inventories) => {
            let video = inventories.video.len();
            let audio = inventories.audio.len();
            let status = |count: usize| if count > 0 { "[OK]" } else { "[MISSING - REQUIRED]" };
            println!("{} Video devices ({}): {video}", status(video), config.ffmpeg.input_format);
            println!("{} Audio devices ({}): {audio}", status(audio), config.ffmpeg.input_format);
            video > 0 && audio > 0
        }
        Err(e) => {
            println!("[FAIL] Device listing: {e}");
            false
        }
    };

    if config.output.dir.is_dir() {
        println!("[OK] Output directory: {}", config.output.dir.display());
    } else {
        println!(
            "[INFO] Output directory {} will be created on first recording",
            config.output.dir.display()
        );
    }
    println!();
    if ready {
        println!("All required capabilities are available. rec is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}
