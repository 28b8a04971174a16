use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use viewer::http::ApiClient;
use viewer::pages;
use viewer::services::trends::TrendRange;

#[derive(Debug, Parser)]
#[command(
    name = "viewer",
    about = "Terminal client for the weather-station telemetry API",
    version
)]
struct Cli {
    /// Base URL of the station backend
    #[arg(
        long,
        env = "STATION_API_URL",
        default_value = "http://localhost:8080",
        global = true
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Station description and photo gallery
    About,
    /// Most recent telemetry packet
    Latest {
        /// Keep polling and re-render on every tick
        #[arg(long)]
        watch: bool,
        /// Polling period in milliseconds (watch mode)
        #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 5000)]
        interval_ms: u64,
    },
    /// Sensor trend charts over a fixed window
    Trends {
        /// One of 24h, 7d, 30d
        #[arg(long, default_value = "24h")]
        range: TrendRange,
    },
    /// Raw-SQL debug console (SELECT only)
    Debug {
        /// Query to run; defaults to the latest five packets
        #[arg(long)]
        sql: Option<String>,
        /// Print the raw JSON response instead of a table
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = ApiClient::new(&cli.api_url)?;

    // No subcommand routes to the About page.
    match cli.command.unwrap_or(Command::About) {
        Command::About => pages::about::run(api).await?,
        Command::Latest { watch, interval_ms } => {
            pages::latest::run(api, watch, Duration::from_millis(interval_ms)).await?
        }
        Command::Trends { range } => pages::trends::run(api, range).await?,
        Command::Debug { sql, raw } => pages::debug::run(api, sql, raw).await?,
    }

    Ok(())
}
