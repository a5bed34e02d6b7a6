use anyhow::Result;
use colored::*;
use reelcast::config::AppConfig;

use super::wiring;

pub fn execute(config: &AppConfig, top: Option<usize>) -> Result<()> {
    let mut analytics = wiring::analytics(config)?;
    let top = top.unwrap_or(config.generation.num_top_videos);

    let updated = analytics.update_video_metrics(top)?;
    println!(
        "{} {} record(s) refreshed",
        "Metrics:".green().bold(),
        updated
    );
    Ok(())
}
