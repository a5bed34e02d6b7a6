use anyhow::Result;
use colored::*;
use std::thread::sleep;
use std::time::Duration;
use tracing::{error, info};

use reelcast::config::AppConfig;

use super::wiring;

/// Generate and refresh once per configured interval. A failed cycle is
/// logged and the loop continues.
pub fn execute(config: &AppConfig, prompt: Option<&str>) -> Result<()> {
    let mut analytics = wiring::analytics(config)?;
    let top = config.generation.num_top_videos;
    let interval = Duration::from_secs(config.generation.interval_hours.max(1) * 3600);

    println!(
        "{} every {}h (Ctrl-C to stop)",
        "Running".bright_cyan().bold(),
        interval.as_secs() / 3600
    );

    if let Some(prompt) = prompt.filter(|p| !p.trim().is_empty()) {
        if let Err(e) = analytics.generate_video(top, prompt) {
            error!(error = %e, "seeded generation failed");
        }
    }

    loop {
        match analytics.generate_video(top, "") {
            Ok(record) => info!(title = %record.title, "cycle video published"),
            Err(e) => error!(error = %e, "cycle generation failed"),
        }
        match analytics.update_video_metrics(top) {
            Ok(updated) => info!(updated, "cycle metrics refreshed"),
            Err(e) => error!(error = %e, "cycle metrics refresh failed"),
        }
        sleep(interval);
    }
}
