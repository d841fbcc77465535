use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use npm_visualizer::config::{self, AppConfig, ChartKind};
use npm_visualizer::logging::init_logging;
use npm_visualizer::render::card::{render_overview, render_suggestions};
use npm_visualizer::render::render_report;
use npm_visualizer::stats::registries::{
    BundleSizeRegistry, JsDelivrStats, NpmRegistry, build_client,
};
use npm_visualizer::stats::report::Visualizer;

#[derive(Parser)]
#[command(name = "npm-visualizer")]
#[command(version, about = "Download statistics and version charts for npm packages")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a JSON config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show the summary card and downloads-by-version chart of a package
    Show {
        package: String,
        #[arg(long, value_enum)]
        chart: Option<ChartKind>,
        /// Number of recent stable versions to chart
        #[arg(long)]
        limit: Option<usize>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Also look up bundle and install sizes
        #[arg(long)]
        bundle: bool,
    },
    /// Suggest package names matching a query
    Search {
        query: String,
        #[arg(long)]
        size: Option<usize>,
    },
    /// Show registry-wide package and download counts
    Overview,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = AppConfig::load(cli.config.as_deref())?;
    let _guard = match init_logging(&app_config.log, cli.verbose, &config::log_path()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };

    info!("Starting npm-visualizer v{}", env!("CARGO_PKG_VERSION"));

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command, app_config))
}

async fn run(command: Command, app_config: AppConfig) -> anyhow::Result<()> {
    let client = build_client(&app_config.http).context("Failed to build HTTP client")?;
    let endpoints = &app_config.endpoints;

    let registry = Arc::new(NpmRegistry::new(
        client.clone(),
        &endpoints.registry,
        &endpoints.downloads_api,
    ));
    let stats = Arc::new(JsDelivrStats::new(client.clone(), &endpoints.jsdelivr));

    let visualizer = Visualizer::new(registry, stats)
        .with_version_limit(app_config.chart.version_limit)
        .with_search(app_config.search.size, app_config.search.min_query_len);

    match command {
        Command::Show {
            package,
            chart,
            limit,
            json,
            bundle,
        } => {
            let mut visualizer = match limit {
                Some(limit) => visualizer.with_version_limit(limit),
                None => visualizer,
            };
            if bundle {
                visualizer = visualizer.with_bundle_source(Arc::new(BundleSizeRegistry::new(
                    client,
                    &endpoints.bundlephobia,
                    &endpoints.packagephobia,
                )));
            }

            let report = match visualizer.load_report(&package).await {
                Ok(report) => report,
                Err(e) => {
                    error!("Failed to load report for {:?}: {}", package, e);
                    anyhow::bail!(e.user_message());
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let kind = chart.unwrap_or(app_config.chart.kind);
                print!("{}", render_report(&report, kind, app_config.chart.width));
            }
        }
        Command::Search { query, size } => {
            let visualizer = match size {
                Some(size) => visualizer.with_search(size, app_config.search.min_query_len),
                None => visualizer,
            };
            let suggestions = visualizer.suggest(&query).await;
            print!("{}", render_suggestions(&suggestions));
        }
        Command::Overview => {
            let overview = visualizer.registry_overview().await;
            print!("{}", render_overview(&overview));
        }
    }

    Ok(())
}
