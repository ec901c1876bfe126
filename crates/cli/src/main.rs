//! Command Line Interface for liquidity pool reports.
mod render;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pool_report_data::normalize::NormalizeOptions;
use pool_report_data::source::{JsonFileSource, PoolFetch, fetch_batch};
use pool_report_engine::comparison::compare_snapshots;
use pool_report_engine::config::{DEFAULT_WINDOW_DAYS, EngineConfig};
use pool_report_engine::portfolio::{PoolFailure, PoolOutcome, build_portfolio};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pool-report")]
#[command(about = "Period-over-period liquidity pool reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report on one pool, or compare several pools
    Report {
        /// Directory holding `<address>.json` pool documents
        #[arg(short, long)]
        fixtures: Option<PathBuf>,

        /// Pool address (repeat for a multi-pool comparison)
        #[arg(short, long = "pool", required = true)]
        pools: Vec<String>,

        /// Ranking metric (volume, tvl_growth, swap_fee, rebalance_count,
        /// boosted_apr, fees, tvl, apr)
        #[arg(short, long = "rank")]
        rankings: Vec<String>,

        /// Comparison window in days
        #[arg(short, long)]
        window_days: Option<u32>,

        /// Pools shown per ranking
        #[arg(long, default_value_t = 3)]
        top: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_fixtures(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    match env::var("POOL_REPORT_FIXTURES") {
        Ok(dir) => Ok(PathBuf::from(dir)),
        Err(_) => bail!("no fixture directory: pass --fixtures or set POOL_REPORT_FIXTURES"),
    }
}

fn resolve_window_days(flag: Option<u32>) -> Result<u32> {
    if let Some(days) = flag {
        return Ok(days);
    }
    match env::var("POOL_REPORT_WINDOW_DAYS") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid POOL_REPORT_WINDOW_DAYS: {raw}")),
        Err(_) => Ok(DEFAULT_WINDOW_DAYS),
    }
}

/// Turns a fetched pool into an engine outcome, keeping failures as data.
fn to_outcome(fetch: PoolFetch, config: &EngineConfig) -> PoolOutcome {
    let compared = fetch.result.map_err(|e| e.to_string()).and_then(|pool| {
        compare_snapshots(&pool.current, pool.historical.as_ref(), config)
            .map_err(|e| e.to_string())
    });
    match compared {
        Ok(result) => PoolOutcome::Resolved(Box::new(result)),
        Err(reason) => PoolOutcome::Failed(PoolFailure {
            address: fetch.address,
            reason,
        }),
    }
}

/// Rankings only apply to multi-pool reports. Returns whether any were dropped.
fn warn_ignored_rankings(rankings: &[String]) -> bool {
    if rankings.is_empty() {
        return false;
    }
    warn!(dropped = ?rankings, "ranking metrics ignored for a single-pool report");
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            fixtures,
            pools,
            rankings,
            window_days,
            top,
            json,
        } => {
            let fixtures = resolve_fixtures(fixtures)?;
            let config = EngineConfig::new()
                .with_window_days(resolve_window_days(window_days)?)
                .with_top_n(top);
            let options = NormalizeOptions::default().with_window_days(config.window_days);

            info!(pools = pools.len(), window_days = config.window_days, "building report");
            let source = JsonFileSource::new(fixtures);
            let outcomes: Vec<PoolOutcome> = fetch_batch(&source, &pools, &options)
                .await
                .into_iter()
                .map(|fetch| to_outcome(fetch, &config))
                .collect();

            if let [single] = pools.as_slice() {
                warn_ignored_rankings(&rankings);
                let result = match outcomes.into_iter().next() {
                    Some(PoolOutcome::Resolved(result)) => *result,
                    Some(PoolOutcome::Failed(failure)) => {
                        bail!("pool {}: {}", failure.address, failure.reason)
                    }
                    None => bail!("pool {single} produced no result"),
                };
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    render::print_pool(&result);
                }
            } else {
                let report = build_portfolio(outcomes, &rankings, &config)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    render::print_portfolio(&report);
                }
            }
        }
    }

    Ok(())
}
