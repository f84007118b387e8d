use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};

use promo_slate::{
    config::Config,
    export::{retention, RetentionPolicy},
};

/// Retention sweep for generated outputs. Run out-of-band (cron or similar);
/// the rendering pipeline itself never evicts anything.
#[derive(Parser)]
#[command(name = "slate-sweep", version, about = "Evict old generated audio and video files")]
struct Cli {
    /// Output directory whose audio/ and video/ subdirectories are swept
    #[arg(short, long, default_value = "static/out")]
    output: PathBuf,

    /// Override the configured TTL in hours
    #[arg(short, long)]
    max_age_hours: Option<u64>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    let config = match cli.config {
        Some(config_path) => Config::from_file(&config_path)?,
        None => Config::default(),
    };

    let max_age_hours = cli.max_age_hours.unwrap_or(config.retention.max_age_hours);
    let policy = RetentionPolicy::from_hours(max_age_hours);

    info!("Sweeping {:?} with TTL {}h", cli.output, max_age_hours);

    let mut removed = 0;
    let mut reclaimed = 0u64;
    for subdir in ["video", "audio"] {
        let stats = retention::sweep(cli.output.join(subdir), &policy)?;
        removed += stats.removed;
        reclaimed += stats.reclaimed_bytes;
    }

    info!(
        "Sweep finished: {} files removed, {:.1} MB reclaimed",
        removed,
        reclaimed as f64 / 1024.0 / 1024.0
    );

    Ok(())
}
