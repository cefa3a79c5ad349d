//! Trails subcommand implementation.
//!
//! Handles `ferthe trails` for managing the local trail catalog.

use super::{Context, OutputFormat};
use crate::contracts::{Spot, Trail, TrailOptions, DEFAULT_DISCOVERY_RADIUS, DEFAULT_SCANNER_RADIUS};
use crate::error::{CliError, CliResult, StorageError};
use crate::output;
use crate::slug::create_slug;
use crate::storage::{open_store, TrailCatalog};
use crate::types::{GeoLocation, SpotId, TrailId};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;

/// Manage trails.
#[derive(Parser, Debug)]
pub struct TrailsCommand {
    #[command(subcommand)]
    pub action: TrailsAction,
}

/// Trail management actions.
#[derive(Subcommand, Debug)]
pub enum TrailsAction {
    /// List all known trails
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        output: OutputFormat,
    },

    /// Show a trail and its spots
    Show {
        /// Trail id
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        output: OutputFormat,
    },

    /// Create a trail from a list of spots
    Add {
        /// Trail id
        id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Trail description
        #[arg(short = 'd', long)]
        description: Option<String>,

        /// Spot as "Name@lat,lon" (repeatable)
        #[arg(long = "spot", value_name = "NAME@LAT,LON", value_parser = parse_spot, required = true)]
        spots: Vec<(String, f64, f64)>,

        /// Scan radius in metres
        #[arg(long, default_value_t = DEFAULT_SCANNER_RADIUS)]
        scanner_radius: f64,

        /// Distance in metres at which a spot counts as discovered
        #[arg(long, default_value_t = DEFAULT_DISCOVERY_RADIUS)]
        discovery_radius: f64,
    },

    /// Import a trail from a JSON file
    Import {
        /// Path to the trail JSON
        file: PathBuf,
    },

    /// Show the spot of a trail closest to a position
    Nearest {
        /// Trail id
        id: String,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

impl TrailsCommand {
    /// Execute the trails command.
    pub fn execute(&self, ctx: &Context<'_>) -> CliResult<()> {
        let (_, catalog) = open_store(ctx.config)?;

        match &self.action {
            TrailsAction::List { output } => {
                output::print_trails(&catalog.list()?, *output)?;
            }
            TrailsAction::Show { id, output } => {
                let trail = find(&catalog, id)?;
                output::print_trail(&trail, *output)?;
            }
            TrailsAction::Add {
                id,
                name,
                description,
                spots,
                scanner_radius,
                discovery_radius,
            } => {
                if *scanner_radius <= 0.0 || *discovery_radius <= 0.0 {
                    return Err(CliError::Other("radii must be positive".to_string()));
                }
                let spots = spots
                    .iter()
                    .map(|(name, lat, lon)| -> CliResult<Spot> {
                        let location = GeoLocation::new(*lat, *lon)?;
                        Ok(Spot::new(SpotId::new(create_slug(name))?, name.as_str(), location))
                    })
                    .collect::<CliResult<Vec<_>>>()?;

                let mut trail = Trail::from_spots(TrailId::new(id)?, name.as_str(), spots)?
                    .with_options(TrailOptions {
                        scanner_radius: *scanner_radius,
                        discovery_radius: *discovery_radius,
                    });
                trail.description = description.clone();

                let count = trail.spots.len();
                catalog.insert(trail)?;
                if !ctx.quiet {
                    output::print_success(&format!("Trail '{id}' saved with {count} spot(s)"));
                }
            }
            TrailsAction::Import { file } => {
                let trail = catalog.import(file)?;
                if !ctx.quiet {
                    output::print_success(&format!("Imported trail '{}'", trail.id));
                }
            }
            TrailsAction::Nearest { id, lat, lon } => {
                let trail = find(&catalog, id)?;
                let here = GeoLocation::new(*lat, *lon)?;
                match trail.nearest_spot(&here) {
                    Some((spot, distance)) => {
                        let direction = here.direction_to(&spot.location);
                        println!(
                            "{} {:.0} m {} ({:.0}°)",
                            style(&spot.name).cyan().bold(),
                            distance,
                            direction.direction,
                            direction.bearing
                        );
                    }
                    None => output::print_warning(&format!("Trail '{id}' has no spots")),
                }
            }
        }
        Ok(())
    }
}

fn find(catalog: &TrailCatalog, id: &str) -> CliResult<Trail> {
    let id = TrailId::new(id)?;
    catalog
        .get(&id)?
        .ok_or_else(|| StorageError::NotFound(id.to_string()).into())
}

/// Parse `Name@lat,lon`.
fn parse_spot(s: &str) -> Result<(String, f64, f64), String> {
    let (name, coords) = s
        .rsplit_once('@')
        .ok_or_else(|| format!("expected NAME@LAT,LON, got '{s}'"))?;
    let (lat, lon) = coords
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON after '@', got '{coords}'"))?;
    let lat = lat.trim().parse().map_err(|_| format!("invalid latitude '{lat}'"))?;
    let lon = lon.trim().parse().map_err(|_| format!("invalid longitude '{lon}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("spot name is empty".to_string());
    }
    Ok((name.to_string(), lat, lon))
}
