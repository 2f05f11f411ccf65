use anyhow::Context;
use clap::{Parser, Subcommand};
use log::warn;
use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    fetch::{FsArtworkFetcher, NoArtwork},
    http::server::HttpServer,
    session::Session,
    source::{QueueSource, script::ScriptSource},
    sync::sink::{FanOutSink, JsonLinesSink, LogSink, SharedSink},
};

#[derive(Parser)]
#[command(name = "radiodeck")]
#[command(version = "0.1")]
#[command(about = "Keeps a now-playing display in sync with internet radio playback")]
pub struct Cli {
    /// Path to the config TOML file; built-in defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the configured station and what would be displayed before any event
    Status,
    /// Replay a TOML event script and print every published descriptor as JSON
    Replay {
        /// Event script to replay
        script: PathBuf,
    },
    /// Run the http server accepting playback events
    Serve,
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = Config::load_or_default(cli.config.as_deref())?;

    match &cli.command {
        Commands::Status => {
            let session = Session::new(&cfg, QueueSource::new(), NoArtwork, LogSink);
            let descriptor = session.current_descriptor();

            println!("Station: {} ({})", cfg.station.name, cfg.station.detail);
            println!("  stream: {}", cfg.station.url);
            if let Some(image) = &cfg.station.image {
                println!("  artwork: {image}");
            }
            println!(
                "Artwork fetching is {}, late artwork policy: {:?}",
                if cfg.artwork.enabled { "on" } else { "off" },
                cfg.artwork.late_policy
            );
            println!("Now playing: {}", descriptor.title);
        }

        Commands::Replay { script } => {
            let source = ScriptSource::load(script)
                .with_context(|| format!("Failed to load {}", script.to_string_lossy()))?;
            let artwork_root = cfg.artwork.root.clone().or_else(|| {
                script
                    .parent()
                    .map(|dir| if dir.as_os_str().is_empty() { Path::new(".") } else { dir })
                    .map(Path::to_path_buf)
            });
            let sink = FanOutSink::new()
                .with(LogSink)
                .with(JsonLinesSink::new(std::io::stdout()));

            eprintln!("Replaying {} events from {}", source.remaining(), script.to_string_lossy());
            let mut session = Session::new(&cfg, source, FsArtworkFetcher::new(artwork_root), sink);
            let handled = session.pump();

            let status = session.status();
            eprintln!(
                "Replayed {} events, published {} descriptors",
                handled, status.descriptors_published
            );
        }

        Commands::Serve => {
            println!("Starting HTTP server...");

            let events = QueueSource::new();
            let published = SharedSink::new();
            let sink = FanOutSink::new().with(LogSink).with(published.clone());
            let session = match &cfg.artwork.root {
                Some(root) => Session::new(
                    &cfg,
                    events.clone(),
                    FsArtworkFetcher::new(Some(root.clone())),
                    sink,
                ),
                None => {
                    warn!("No [artwork] root configured, artwork changes will not be fetched");
                    Session::new(&cfg, events.clone(), NoArtwork, sink)
                }
            };

            let http_server = HttpServer::new(session, events, published, cfg.http.clone());

            println!(
                "HTTP server running at http://{}:{}",
                http_server.config.bind_addr, http_server.config.port
            );
            http_server.run();
        }
    }

    Ok(())
}
