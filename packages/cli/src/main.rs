#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal dashboard for the ride analytics service.
//!
//! Each subcommand mounts one panel (or, with `all`, every panel
//! concurrently), shows a spinner while it loads, and prints the derived
//! view as text, JSON, or `GeoJSON`.
//!
//! Uses `indicatif-log-bridge` (via [`ride_insights_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and spinners never fight for the terminal.

mod export;
mod render;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ride_insights_panel::Dashboard;
use ride_insights_source::{ClientConfig, HttpRideSource};

use crate::run::{PanelOutcome, RunOptions};

// ---------------------------------------------------------------------------
// CLI definitions
// ---------------------------------------------------------------------------

/// Show ride analytics panels in the terminal.
#[derive(Parser)]
#[command(name = "ride_insights")]
#[command(about = "Show ride analytics panels in the terminal")]
struct Cli {
    /// TOML file replacing the built-in client configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API root of the analytics service, e.g. `http://localhost:5000/api`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// How many times a failed panel is refreshed before giving up.
    #[arg(long, global = true, default_value_t = 0)]
    retries: u32,

    /// Panel to show.
    #[command(subcommand)]
    command: Commands,
}

/// Panels that can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Rides per hour of day.
    Hourly,
    /// Rides per day of month.
    Daily,
    /// Rides per day of week, weekends highlighted.
    Weekday,
    /// Overall ride totals and per-day extremes.
    Summary,
    /// Pickup points coloured by cluster.
    Clusters,
    /// Pickup density heatmap.
    Heatmap,
    /// Every panel at once.
    All,
}

impl Commands {
    const fn supports_geojson(self) -> bool {
        matches!(self, Self::Clusters | Self::Heatmap)
    }
}

/// How panels are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// The panel state as JSON.
    Json,
    /// A `GeoJSON` `FeatureCollection` (map panels only).
    Geojson,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let multi = ride_insights_cli_utils::init_logger();

    if cli.format == OutputFormat::Geojson && !cli.command.supports_geojson() {
        return Err("--format geojson is only available for the clusters and heatmap panels".into());
    }

    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.base_url {
        config = config.with_base_url(url)?;
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout_secs(secs)?;
    }
    log::info!("Using ride analytics service at {}", config.base_url);

    let source = HttpRideSource::new(&config)?;
    let dashboard = Dashboard::new();
    let options = RunOptions {
        format: cli.format,
        retries: cli.retries,
        multi: &multi,
    };

    let outcomes: Vec<PanelOutcome> = match cli.command {
        Commands::Hourly => vec![run::panel(&dashboard.hourly, &source, &options).await?],
        Commands::Daily => vec![run::panel(&dashboard.daily, &source, &options).await?],
        Commands::Weekday => vec![run::panel(&dashboard.weekday, &source, &options).await?],
        Commands::Summary => vec![run::panel(&dashboard.summary, &source, &options).await?],
        Commands::Clusters => vec![run::panel(&dashboard.clusters, &source, &options).await?],
        Commands::Heatmap => vec![run::panel(&dashboard.heatmap, &source, &options).await?],
        Commands::All => {
            let (hourly, daily, weekday, summary, clusters, heatmap) = futures::join!(
                run::panel(&dashboard.hourly, &source, &options),
                run::panel(&dashboard.daily, &source, &options),
                run::panel(&dashboard.weekday, &source, &options),
                run::panel(&dashboard.summary, &source, &options),
                run::panel(&dashboard.clusters, &source, &options),
                run::panel(&dashboard.heatmap, &source, &options),
            );
            vec![hourly?, daily?, weekday?, summary?, clusters?, heatmap?]
        }
    };
    dashboard.teardown_all();

    let failed = outcomes.iter().filter(|o| o.failed).count();
    println!("{}", run::document(outcomes)?);

    if failed > 0 {
        return Err(format!("{failed} panel(s) failed to load").into());
    }

    Ok(())
}
