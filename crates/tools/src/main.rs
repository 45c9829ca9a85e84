use std::env;
use std::path::PathBuf;

use catalog::CameraCatalog;
use catalog::filter::DEFAULT_NEAREST_LIMIT;
use clap::{Parser, Subcommand};
use foundation::{CameraId, LatLon};
use serde::Serialize;
use tools::ToolError;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Route and neighbor tooling for camera data files")]
struct Args {
    /// Camera list or GeoJSON file (default: $CAMROUTE_CAMERAS or data/cameras.json)
    #[arg(long, global = true)]
    cameras: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a multiRoute value to an ordered camera list
    Resolve {
        /// e.g. 15P:300-320,84P:120-80
        multi_route: String,

        /// Keep cameras whose primary view is disabled
        #[arg(long)]
        include_disabled: bool,
    },

    /// Print the neighbor chain around one camera
    Neighbors {
        id: u64,

        #[arg(long, default_value_t = 3)]
        depth: usize,
    },

    /// Count roadway values across the camera list
    Routes,

    /// Check authored neighbor metadata
    Validate,

    /// Cameras closest to a point
    Nearest {
        #[arg(allow_hyphen_values = true)]
        lat: f64,

        #[arg(allow_hyphen_values = true)]
        lon: f64,

        /// Default: $CAMROUTE_NEAREST_LIMIT or 50
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Expand a curated routes file against the camera list
    Curated {
        /// Default: $CAMROUTE_ROUTES or data/routes.json
        #[arg(long)]
        routes: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ToolError> {
    let cameras_path = args.cameras.unwrap_or_else(|| {
        env::var("CAMROUTE_CAMERAS")
            .unwrap_or_else(|_| "data/cameras.json".to_string())
            .into()
    });
    let list = tools::load_cameras(&cameras_path)?;

    match args.command {
        Command::Resolve {
            multi_route,
            include_disabled,
        } => print_json(&tools::resolve_report(
            &list.cameras,
            &multi_route,
            include_disabled,
        )),
        Command::Neighbors { id, depth } => {
            let catalog = CameraCatalog::new(list.cameras);
            print_json(&tools::neighbor_report(&catalog, CameraId(id), depth)?)
        }
        Command::Routes => print_json(&tools::route_stats(&list.cameras)),
        Command::Validate => {
            let catalog = CameraCatalog::new(list.cameras);
            print_json(&tools::validate_report(&catalog))
        }
        Command::Nearest { lat, lon, limit } => {
            let limit = limit.unwrap_or_else(|| {
                env::var("CAMROUTE_NEAREST_LIMIT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_NEAREST_LIMIT)
            });
            print_json(&tools::nearest_report(
                &list.cameras,
                LatLon::new(lat, lon),
                limit,
            ))
        }
        Command::Curated { routes } => {
            let routes_path = routes.unwrap_or_else(|| {
                env::var("CAMROUTE_ROUTES")
                    .unwrap_or_else(|_| "data/routes.json".to_string())
                    .into()
            });
            let defs = tools::load_route_defs(&routes_path)?;
            print_json(&tools::curated_report(&defs, &list.cameras))
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => error!("serialize output: {e}"),
    }
}
