use anyhow::Result;
use clap::{Parser, Subcommand};
use reelcast::AppConfig;
use std::path::{Path, PathBuf};

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Generate, publish and track videos from keyword engagement", long_about = None)]
struct Cli {
    /// Config file (default: ./reelcast.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one video, publish it and record it
    Generate {
        /// Words placed ahead of the ranked keywords
        #[arg(short, long, default_value = "")]
        prompt: String,

        /// Records read per engagement dimension
        #[arg(long)]
        top: Option<usize>,
    },

    /// Refresh stored engagement counters from the platforms
    UpdateMetrics {
        /// Most viewed records to refresh
        #[arg(long)]
        top: Option<usize>,
    },

    /// Show keywords ranked by engagement
    Keywords {
        /// Records read per engagement dimension
        #[arg(long)]
        top: Option<usize>,

        /// Also expand into this many new keywords
        #[arg(long)]
        expand: Option<usize>,
    },

    /// Generate and refresh on a fixed interval, forever
    Run {
        /// Seed the first video with this prompt
        #[arg(short, long)]
        prompt: Option<String>,
    },

    /// Write a config file with default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(reelcast::config::default_path);

    match cli.command {
        Commands::Generate { prompt, top } => {
            let config = load_config(&config_path)?;
            commands::generate::execute(&config, &prompt, top)?;
        }
        Commands::UpdateMetrics { top } => {
            let config = load_config(&config_path)?;
            commands::update_metrics::execute(&config, top)?;
        }
        Commands::Keywords { top, expand } => {
            let config = load_config(&config_path)?;
            commands::keywords::execute(&config, top, expand)?;
        }
        Commands::Run { prompt } => {
            let config = load_config(&config_path)?;
            commands::run::execute(&config, prompt.as_deref())?;
        }
        Commands::InitConfig { force } => {
            commands::init_config::execute(&config_path, force)?;
        }
    }

    Ok(())
}

/// Load config and start logging at its level
fn load_config(path: &Path) -> Result<AppConfig> {
    let config = reelcast::config::load(path)?;
    reelcast::logging::init(&config.logging.level);
    Ok(config)
}
