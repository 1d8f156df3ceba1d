use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nature_paper::config::{self, ConfigStore};
use nature_paper::options::{self, Gravity, RawOptions};
use nature_paper::{url, NaturePaper};

/// Fetch a random nature wallpaper sized to your screen.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Image width in pixels
    #[arg(short, long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Directory to save into; "./x" and "~/x" forms are expanded
    #[arg(short, long)]
    dir: Option<String>,

    /// Request a specific image id
    #[arg(long)]
    image: Option<String>,

    /// Crop anchor
    #[arg(long, value_enum)]
    gravity: Option<Gravity>,

    /// Ask for a grayscale image
    #[arg(long)]
    grayscale: bool,

    /// Ask for a blurred image
    #[arg(long)]
    blur: bool,

    /// Mode words: "random", "latest"
    #[arg(value_name = "MODE")]
    tokens: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let invocation = options::sanitize(RawOptions {
        tokens: cli.tokens,
        width: cli.width,
        height: cli.height,
        dir: cli.dir,
        image: cli.image,
        gravity: cli.gravity,
        grayscale: cli.grayscale,
        blur: cli.blur,
    });

    let store = ConfigStore::new(config::default_path());
    let app = NaturePaper::new(store, invocation).await;

    let segment = url::grayscale_segment(app.options());
    let params = url::selection_params(app.options());
    if !segment.is_empty() || !params.is_empty() {
        debug!(
            segment,
            ?params,
            "selection flags are not applied by the category endpoint"
        );
    }

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}%")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar.set_message("Downloading");

    let saved = app.fetch(|pct| bar.set_position(pct.round() as u64)).await?;
    bar.finish_and_clear();

    println!("Saved {}", saved.display());

    app.persist().await?;
    Ok(())
}
