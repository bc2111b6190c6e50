use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use adiz_dashboard::app::DashboardView;
use adiz_dashboard::build_dashboard;
use adiz_dashboard::config::{Config, SourceMode};
use adiz_dashboard::constants::EXPORT_FILE_NAME;
use adiz_dashboard::logging;
use adiz_dashboard::observability::metrics;
use adiz_dashboard::pipeline::normalize::parse_date;
use adiz_dashboard::pipeline::ViewRequest;
use adiz_dashboard::server::{start_server, AppState};

#[derive(Parser)]
#[command(name = "adiz_dashboard")]
#[command(about = "Daily PLA aircraft, ADIZ incursion and vessel counts around Taiwan")]
#[command(version)]
struct Cli {
    /// TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data source: remote, local or synthetic
    #[arg(long, global = true)]
    source: Option<SourceMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the latest-day metrics for a date range
    Summary {
        #[arg(long, value_parser = parse_cli_date)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_cli_date)]
        end: Option<NaiveDate>,
    },
    /// Write the filtered range as CSV
    Export {
        #[arg(long, value_parser = parse_cli_date)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_cli_date)]
        end: Option<NaiveDate>,
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
    },
}

fn parse_cli_date(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("'{raw}' is not a date (expected YYYY-MM-DD)"))
}

fn print_summary(view: &DashboardView) {
    match view.summary.as_of {
        Some(as_of) => println!("As of {}", as_of),
        None => println!("No data in range"),
    }
    for metric in &view.summary.metrics {
        let value = metric
            .value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        println!("  {:<40} {:>6} ({:+})", metric.label, value, metric.delta);
    }
    println!("Rows in range: {}", view.summary.row_count);
    println!(
        "Source rows dropped: {} of {} ({})",
        view.load.rows_dropped, view.load.rows_read, view.origin
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();

    if let Err(e) = metrics::init() {
        warn!("Metrics disabled: {}", e);
    }

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(mode) = cli.source {
        config.source.mode = mode;
    }
    info!(mode = ?config.source.mode, ttl_secs = config.cache.ttl_secs, "Configuration loaded");

    let dashboard = build_dashboard(&config);

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            start_server(AppState::new(dashboard), port).await?;
        }
        Commands::Summary { start, end } => {
            let view = dashboard.render(ViewRequest::new(start, end)).await?;
            print_summary(&view);
        }
        Commands::Export { start, end, out } => {
            let bytes = dashboard.export(ViewRequest::new(start, end)).await?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote {} ({} bytes)", out.display(), bytes.len());
        }
    }

    Ok(())
}
