use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::{signal, time};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use event_fetcher::{
    EventQuery, EventSource, EventsConfig, HttpEventSource, MapState, MarkerLayer,
    RefreshSession, Viewport,
};

#[derive(Parser)]
#[command(name = "events")]
#[command(about = "Fetch geotagged events for a map viewport from an events host")]
#[command(
    long_about = "Builds the bounding query the map screen sends for its visible area,\n\
    fetches the events JSON feed, and prints each event the way its map pin shows it."
)]
struct Cli {
    /// TOML config file. Missing fields fall back to defaults.
    #[arg(short, long, value_name = "FILE", env = "EVENTS_CONFIG")]
    config: Option<PathBuf>,

    /// Events feed URL, overriding the config file
    #[arg(short, long, value_name = "URL", env = "EVENTS_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the request URL for a viewport without fetching
    Url {
        #[command(flatten)]
        viewport: ViewportArgs,
    },

    /// Fetch events for a viewport once and print them
    Fetch {
        #[command(flatten)]
        viewport: ViewportArgs,

        /// Print the events as JSON instead of pin text
        #[arg(long)]
        json: bool,
    },

    /// Refresh the same viewport periodically until Ctrl+C
    ///
    /// A refresh that is still waiting on the host when the next one is due
    /// is cancelled; the markers shown always come from the latest request.
    Watch {
        #[command(flatten)]
        viewport: ViewportArgs,

        /// Seconds between refreshes, overriding the config file
        #[arg(short, long, value_name = "SECS")]
        interval_secs: Option<u64>,
    },

    /// Print an example config file
    InitConfig,
}

/// Visible map area in decimal degrees.
#[derive(Args, Clone, Copy)]
struct ViewportArgs {
    /// Latitude of the map center
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude of the map center
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Visible latitude span
    #[arg(long)]
    lat_span: f64,

    /// Visible longitude span
    #[arg(long)]
    lon_span: f64,
}

impl From<ViewportArgs> for Viewport {
    fn from(args: ViewportArgs) -> Self {
        Viewport::new(args.lat, args.lon, args.lat_span, args.lon_span)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_fetcher=info,events=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EventsConfig::load(path)?,
        None => EventsConfig::default(),
    };
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    match cli.command {
        Commands::InitConfig => {
            let text = toml::to_string_pretty(&EventsConfig::example())
                .context("Failed to serialize example config")?;
            print!("{}", text);
        }
        Commands::Url { viewport } => {
            let query = EventQuery::from_viewport(&viewport.into());
            println!("{}", query.to_url(&config.endpoint_url()?));
        }
        Commands::Fetch { viewport, json } => {
            let source = build_source(&config)?;
            fetch_once(&source, viewport.into(), json).await?;
        }
        Commands::Watch {
            viewport,
            interval_secs,
        } => {
            if let Some(secs) = interval_secs {
                config.refresh_interval_secs = secs;
            }
            let source = build_source(&config)?;
            watch(Arc::new(source), viewport.into(), &config).await?;
        }
    }

    Ok(())
}

fn build_source(config: &EventsConfig) -> Result<HttpEventSource> {
    let source = HttpEventSource::new(config.endpoint_url()?, config)
        .context("Failed to create events client")?;
    tracing::info!("Using events host {}", source.endpoint());
    Ok(source)
}

async fn fetch_once(source: &HttpEventSource, viewport: Viewport, json: bool) -> Result<()> {
    let query = EventQuery::from_viewport(&viewport);
    let events = match source.fetch_events(&query).await {
        Ok(events) => events,
        Err(e) => anyhow::bail!("{} error: {}", e.kind().as_str(), e),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&events).context("Failed to serialize events")?
        );
        return Ok(());
    }

    match MarkerLayer::from_events(&events).into_overlay() {
        Some(layer) => print_layer(&layer),
        None => println!("No events in this area."),
    }
    Ok(())
}

async fn watch(source: Arc<dyn EventSource>, viewport: Viewport, config: &EventsConfig) -> Result<()> {
    let mut session = RefreshSession::new(source);
    let mut state = MapState::new();
    let mut ticker = time::interval(config.refresh_interval());

    tracing::info!(
        "Watching viewport (interval: {:?}). Press Ctrl+C to stop.",
        config.refresh_interval()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                session.refresh(viewport);
            }
            Some(outcome) = session.next_outcome() => {
                let generation = outcome.generation;
                if state.apply(outcome) {
                    println!("--- refresh {} ({} events)", generation, state.events().len());
                    match state.overlay() {
                        Some(layer) => print_layer(layer),
                        None => println!("No events in this area."),
                    }
                } else if let Some(failure) = state.last_error() {
                    eprintln!("refresh {} failed ({}): {}", generation, failure.kind.as_str(), failure.message);
                }
            }
            _ = signal::ctrl_c() => {
                tracing::info!("Shutdown signal received, stopping...");
                break;
            }
        }
    }

    session.cancel();
    Ok(())
}

fn print_layer(layer: &MarkerLayer) {
    for marker in layer {
        println!(
            "{} @ ({:.6}, {:.6})",
            marker.title,
            marker.point.latitude(),
            marker.point.longitude()
        );
        for line in marker.snippet.lines() {
            println!("    {}", line);
        }
    }
}
