use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

use rescue_router::config::RouterConfig;
use rescue_router::error::RouteError;
use rescue_router::model::{Depot, DepotId, Point, Report};
use rescue_router::nearest::nearest_depots;
use rescue_router::osrm::OsrmClient;
use rescue_router::polyline;
use rescue_router::router::GeoClusterRouter;

#[derive(Debug, Parser)]
#[command(name = "rescue-router", about = "Cluster rescue reports and route them from shelters")]
struct Cli {
    /// Router configuration (JSON). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output; repeat for trace.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Cluster reports around depots and request a round trip per cluster.
    Routes {
        #[arg(long)]
        reports: PathBuf,
        #[arg(long)]
        depots: PathBuf,
    },
    /// List the depots closest to a position.
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        depots: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
        /// Also request the driving route to the closest depot.
        #[arg(long)]
        route: bool,
        /// Route to this depot instead of the closest one.
        #[arg(long, requires = "route")]
        depot: Option<u64>,
    },
    /// Decode an encoded polyline into points.
    Decode {
        encoded: String,
        #[arg(
            long,
            default_value_t = polyline::DEFAULT_PRECISION,
            value_parser = clap::value_parser!(u32).range(1..=10)
        )]
        precision: u32,
        /// Print marker frames at the configured animation step instead.
        #[arg(long)]
        animate: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_writer(io::stderr)
        .with_max_level(level)
        .finish();
    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("could not install logger: {error}");
    }

    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => RouterConfig::from_json_file(path)?,
        None => RouterConfig::default(),
    };

    match cli.command {
        Command::Routes { reports, depots } => {
            let reports: Vec<Report> = read_json(&reports)?;
            let depots: Vec<Depot> = read_json(&depots)?;
            let client = OsrmClient::new(config.osrm.clone()).context("building http client")?;
            let router = GeoClusterRouter::new(client, config.region_groups.clone());

            match router.compute_routes(&reports, &depots) {
                Ok(outcome) => {
                    if outcome.is_partial() {
                        let missing: Vec<String> =
                            outcome.failed_depots().iter().map(ToString::to_string).collect();
                        warn!(missing = %missing.join(", "), "some clusters could not be routed");
                    }
                    print_json(&outcome)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(RouteError::AllClustersFailed { failures }) => {
                    for failure in &failures {
                        eprintln!("{}: {}", failure.depot_id, failure.reason);
                    }
                    eprintln!("no cluster could be routed; retry once the routing service is reachable");
                    Ok(ExitCode::FAILURE)
                }
                Err(error) => Err(error.into()),
            }
        }
        Command::Nearest {
            lat,
            lng,
            depots,
            limit,
            route,
            depot,
        } => {
            let origin = Point::new(lat, lng);
            let depots: Vec<Depot> = read_json(&depots)?;
            let nearest = nearest_depots(origin, &depots, limit.unwrap_or(config.nearest_limit))?;
            print_json(&nearest)?;

            if route {
                let client = OsrmClient::new(config.osrm.clone()).context("building http client")?;
                let router = GeoClusterRouter::new(client, config.region_groups.clone());
                let direct = match depot {
                    Some(id) => {
                        let chosen = depots
                            .iter()
                            .find(|candidate| candidate.id == DepotId(id))
                            .with_context(|| format!("no depot with id {id}"))?;
                        router.route_to_depot(origin, chosen)?
                    }
                    None => router.route_to_nearest_depot(origin, &depots)?,
                };
                print_json(&direct)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Decode {
            encoded,
            precision,
            animate,
        } => {
            let decoded = polyline::decode_with_precision(&encoded, precision)?;
            if animate {
                let frames: Vec<_> = config.marker_animation(&decoded).frames().collect();
                print_json(&frames)?;
            } else {
                print_json(&decoded)?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
