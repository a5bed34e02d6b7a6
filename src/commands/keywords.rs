use anyhow::Result;
use colored::*;
use reelcast::config::AppConfig;

use super::wiring;

pub fn execute(config: &AppConfig, top: Option<usize>, expand: Option<usize>) -> Result<()> {
    let mut store = wiring::open_store(config)?;
    let generator = wiring::keyword_generator(config);
    let top = top.unwrap_or(config.generation.num_top_videos);

    let ranked = generator.get_top_keywords(&mut store, top)?;
    if ranked.is_empty() {
        println!("{}", "No keyword history yet.".yellow());
        return Ok(());
    }

    println!("{}", "Top keywords".bright_cyan().bold());
    for (rank, keyword) in ranked.iter().enumerate() {
        println!("  {:>3}. {}", rank + 1, keyword);
    }

    if let Some(count) = expand {
        let expanded = generator.generate_keywords(&mut store, count, top)?;
        println!();
        println!("{}", "Expanded".bright_cyan().bold());
        if expanded.is_empty() {
            println!("  {}", "(word vectors unavailable)".dimmed());
        }
        for keyword in expanded {
            println!("  - {}", keyword);
        }
    }
    Ok(())
}
