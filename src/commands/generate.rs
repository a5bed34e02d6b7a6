use anyhow::Result;
use colored::*;
use reelcast::config::AppConfig;

use super::wiring;

pub fn execute(config: &AppConfig, prompt: &str, top: Option<usize>) -> Result<()> {
    let mut analytics = wiring::analytics(config)?;
    let top = top.unwrap_or(config.generation.num_top_videos);

    println!("{}", "Generating video...".bright_cyan());
    let record = analytics.generate_video(top, prompt)?;

    println!("{} {}", "Published:".green().bold(), record.title);
    for url in &record.urls {
        println!("  {}", url);
    }
    println!("  {} {}", "keywords:".dimmed(), record.keywords.join(", "));
    Ok(())
}
