//! floorviz_client - Command line front end for the visualizer
//!
//! Uploads a room photo and floor samples, streams the generation and saves
//! the result as PNG.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use floorviz::generate::{GenerationEvent, INVALID_REQUEST_MESSAGE};
use floorviz::studio::{GenerateClient, ImageSource, Studio, ViewState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Floor visualizer client
#[derive(Parser, Debug)]
#[command(
    name = "floorviz_client",
    version,
    about = "Render a room with a new floor"
)]
struct Args {
    /// Base URL of the floorviz server
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Room photo
    #[arg(short, long)]
    room: PathBuf,

    /// Floor sample (up to three, can be specified multiple times)
    #[arg(short, long = "floor", required = true)]
    floors: Vec<PathBuf>,

    /// Directory to save the result in
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Wait for the whole response instead of streaming
    #[arg(long)]
    sync: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "floorviz=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if !args.out.is_dir() {
        bail!("Output directory not found: {}", args.out.display());
    }

    let mut studio = Studio::new();
    studio.upload_room(vec![ImageSource::Path(args.room)]).await;
    studio
        .upload_floors(args.floors.into_iter().map(ImageSource::Path).collect())
        .await;

    if let Some(error) = studio.view().error() {
        bail!("{}", error);
    }
    if !studio.can_generate() {
        bail!("{}", INVALID_REQUEST_MESSAGE);
    }

    let client = GenerateClient::new(args.server)?;
    if args.sync {
        studio.generate_once(&client).await;
    } else {
        studio
            .generate_with(&client, |event| match event {
                GenerationEvent::Status(text) => info!("{}", text),
                GenerationEvent::Image(_) => info!("Afbeelding ontvangen"),
                GenerationEvent::Error(message) => info!("Fout: {}", message),
                GenerationEvent::Done => {}
            })
            .await;
    }

    match studio.view() {
        ViewState::Showing { error, .. } => {
            if let Some(error) = error {
                info!("Finished with warning: {}", error);
            }
            let path = studio.download(client.http(), &args.out).await?;
            println!("{}", path.display());
            Ok(())
        }
        other => bail!(
            "{}",
            other.error().unwrap_or(floorviz::studio::GENERIC_FAILURE_MESSAGE)
        ),
    }
}
