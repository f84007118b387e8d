use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};

use promo_slate::{catalog, config::Config, pipeline::PipelineEngine};

#[derive(Parser)]
#[command(
    name = "promo-slate",
    version,
    about = "Generate paired landscape and portrait promo videos from a product list",
    long_about = "promo-slate renders one text-overlay slide per product, concatenates them \
into a timeline per resolution profile, binds an optional narration track, and encodes both \
cuts with collision-free output names."
)]
struct Cli {
    /// Product list as a JSON array of {title, description} records
    #[arg(short, long)]
    products: PathBuf,

    /// Narration audio file (WAV, MP3, FLAC); omit for silent output
    #[arg(short, long)]
    audio: Option<PathBuf>,

    /// Output directory (created on demand)
    #[arg(short, long, default_value = "static/out")]
    output: PathBuf,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting promo-slate v{}", env!("CARGO_PKG_VERSION"));
    info!("Products: {:?}", cli.products);
    info!("Audio: {:?}", cli.audio);
    info!("Output: {:?}", cli.output);

    let config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    let products = catalog::load_products(&cli.products)?;
    info!("Loaded {} products", products.len());

    let engine = PipelineEngine::new(config)?;
    let output = engine
        .render(&products, cli.audio.as_deref(), &cli.output)
        .await?;

    for warning in &output.warnings {
        warn!("Degraded mode: {}", warning);
    }

    for (profile, video) in &output.videos {
        info!("{}: {:?} ({:.1}s)", profile, video.path, video.duration);
    }

    Ok(())
}
