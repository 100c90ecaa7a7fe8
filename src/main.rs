use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};

use snapify::{
    booth::PhotoBooth,
    capture::{DirectorySource, FrameSource, TestPatternSource},
    config::Config,
    pipeline::{FilterPipeline, RemoteFilterPipeline},
};

#[derive(Parser)]
#[command(
    name = "snapify",
    version,
    about = "Countdown photobooth: capture three photos, sepia-filter them remotely, compose photostrips",
    long_about = "Snapify runs one photobooth session headlessly: a countdown scheduler captures \
three stills from a directory of frames (or a synthetic test pattern), each photo is pushed \
through the remote upload and sepia services, and both photo sets plus their photostrips are \
written to the output directory."
)]
struct Cli {
    /// Directory of still images standing in for the webcam
    #[arg(short, long)]
    frames: Option<PathBuf>,

    /// Output directory for photos and photostrips (default: snapify-<timestamp>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the remote sepia pipeline and keep raw photos only
    #[arg(long)]
    no_filter: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Snapify v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
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
    config.validate()?;

    let source: Box<dyn FrameSource> = match &cli.frames {
        Some(dir) => {
            info!("Using frames from {:?}", dir);
            Box::new(DirectorySource::new(dir)?)
        }
        None => {
            info!("No --frames directory, using synthetic test pattern");
            Box::new(TestPatternSource::new(1280, 720))
        }
    };

    let pipeline: Option<Arc<dyn FilterPipeline>> = if cli.no_filter {
        warn!("Sepia pipeline disabled, only raw photos will be produced");
        None
    } else {
        Some(Arc::new(RemoteFilterPipeline::new(config.pipeline.clone())?))
    };

    let output = cli.output.unwrap_or_else(|| {
        PathBuf::from(format!("snapify-{}", chrono::Local::now().format("%Y%m%d-%H%M%S")))
    });

    let mut booth = PhotoBooth::new(config, source, pipeline)?;

    booth.start_capture().await;
    booth.wait().await;

    // Give in-flight filter requests a moment to land before downloading
    tokio::time::sleep(std::time::Duration::from_secs(2)).await;

    let session = booth.session();
    let (photos, sepia_photos) = {
        let session = session.lock().await;
        (session.photos().len(), session.sepia_photos().len())
    };
    info!("Session complete: {} photos, {} sepia photos", photos, sepia_photos);

    booth.download_raw(&output).await;
    booth.download_raw_strip(&output).await;
    if sepia_photos > 0 {
        booth.download_filtered(&output).await;
        booth.download_filtered_strip(&output).await;
    }

    info!("Output saved to: {:?}", output);
    Ok(())
}
