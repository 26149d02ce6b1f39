//! Pick a device pair and record it.

use rec_capture_engine::{CaptureSession, SessionConfig, SystemRunner};
use rec_common::config::RecConfig;
use rec_picker::TerminalSurface;

pub async fn run(config: &RecConfig, json: bool) -> anyhow::Result<()> {
    let session = CaptureSession::new(SessionConfig::from(config), SystemRunner::new());
    let mut surface = TerminalSurface::new();

    let outcome = session.run(&mut surface).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!();
    println!("Recording saved to: {}", outcome.output.display());
    println!("  Devices: {}", outcome.locator);
    println!("  Started: {}", outcome.started_at.to_rfc3339());
    println!("  Duration: {:.1}s", outcome.elapsed.as_secs_f64());

    Ok(())
}
