//! Scan subcommand implementation.
//!
//! Handles the `ferthe scan [trail]` command.

use super::{Context, OutputFormat};
use crate::contracts::PendingScan;
use crate::error::CliResult;
use crate::events::EventStore;
use crate::output;
use crate::sensor::{FixedLocation, LocalSensor, ScanSession, ScanStarted};
use crate::storage::open_store;
use crate::types::{GeoLocation, TrailId};
use clap::Parser;
use std::sync::Arc;
use tracing::debug;

/// Scan for spots around a position.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Restrict the scan to one trail (id); scans every known trail if omitted
    #[arg(value_name = "TRAIL")]
    pub trail: Option<String>,

    /// Latitude of the current position
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude of the current position
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Record the scan without showing clues
    #[arg(long)]
    pub silent: bool,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, ctx: &Context<'_>) -> CliResult<()> {
        let here = GeoLocation::new(self.lat, self.lon)?;
        let trail = self.trail.as_deref().map(TrailId::new).transpose()?;

        let (scans, trails) = open_store(ctx.config)?;
        let sensor = LocalSensor::new(
            Arc::new(trails),
            scans,
            Arc::new(FixedLocation::new(here)),
        );
        let session = ScanSession::new(ctx.account.clone(), Arc::new(sensor))
            .with_timeout(ctx.config.api_timeout);

        let chatty = !ctx.quiet && !self.silent && self.output == OutputFormat::Plain;
        if chatty {
            session.events().on_fn::<ScanStarted, _>(|pending: &PendingScan| {
                let scope = pending
                    .trail_id
                    .as_ref()
                    .map_or_else(|| "all trails".to_string(), |t| t.to_string());
                output::print_info(&format!("Scanning {scope}..."));
            });
        }

        let event = if self.silent {
            session.start_silent_scan(trail).await?
        } else {
            session.start_scan(trail).await?
        };
        debug!(scan = %event.id(), "scan finished");

        if self.silent {
            if !ctx.quiet {
                output::print_success(&format!("Scan {} recorded", event.id().short()));
            }
            return Ok(());
        }

        output::print_scan(&event, self.output)?;
        if chatty {
            if ctx.verbose {
                output::print_info(&event.summary());
            }
            output::print_success(&format!("Scan saved as {}", event.id().short()));
        }
        Ok(())
    }
}
