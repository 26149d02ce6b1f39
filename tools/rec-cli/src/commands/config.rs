//! Show or save the effective configuration.

use rec_common::config::RecConfig;

pub fn run(config: &RecConfig, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if write {
        let path = config.save()?;
        println!();
        println!("Configuration written to: {}", path.display());
    }
    Ok(())
}
