//! History subcommand implementation.

use super::{Context, OutputFormat};
use crate::contracts::{parse_query_options, ScanEvent, SensorApplication};
use crate::error::{CliResult, SensorError, StorageError, StorageResult};
use crate::output;
use crate::sensor::{FixedLocation, LocalSensor};
use crate::storage::{open_store, ScanEventStore};
use crate::types::{AccountId, ScanEventId, TrailId};
use clap::{Parser, Subcommand};
use std::sync::Arc;

/// View and manage scan history.
#[derive(Parser, Debug)]
pub struct HistoryCommand {
    #[command(subcommand)]
    pub action: Option<HistoryAction>,

    /// Number of recent scans to show
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Only show scans of this trail
    #[arg(long, value_name = "TRAIL")]
    pub trail: Option<String>,

    /// Query option as key=value (limit, offset, sortBy, sortOrder, search)
    #[arg(short = 'Q', long, value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub query: Vec<(String, String)>,

    /// Clear the scan history of the current account
    #[arg(long)]
    pub clear: bool,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// Show one past scan with its clues
    Show {
        /// Scan ID or a unique prefix of it
        #[arg(value_name = "ID-PREFIX")]
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        output: OutputFormat,
    },
}

impl HistoryCommand {
    /// Execute the history command.
    pub async fn execute(&self, ctx: &Context<'_>) -> CliResult<()> {
        let (scans, trails) = open_store(ctx.config)?;

        if let Some(HistoryAction::Show { id, output }) = &self.action {
            let event = find_scan(scans.as_ref(), &ctx.account, id)?;
            output::print_scan(&event, *output)?;
            return Ok(());
        }

        if self.clear {
            let removed = scans.clear(&ctx.account)?;
            if !ctx.quiet {
                output::print_success(&format!(
                    "Removed {removed} scan(s) of account '{}'",
                    ctx.account
                ));
            }
            return Ok(());
        }

        let trail = self.trail.as_deref().map(TrailId::new).transpose()?;
        let mut options = parse_query_options(self.query.iter().cloned()).unwrap_or_default();
        if options.limit.is_none() {
            options.limit = Some(self.count);
        }

        let sensor = LocalSensor::new(
            Arc::new(trails),
            scans,
            Arc::new(FixedLocation::unavailable()),
        );
        let events = sensor
            .list_scan_events(&ctx.account, trail.as_ref(), Some(options))
            .await
            .into_result()
            .map_err(SensorError::Rejected)?;

        output::print_history(&events, self.output)?;
        Ok(())
    }
}

/// Look up a scan of `account` by full id or by a unique id prefix.
fn find_scan(
    store: &dyn ScanEventStore,
    account: &AccountId,
    id: &str,
) -> StorageResult<ScanEvent> {
    let id = id.trim();
    match id.parse::<ScanEventId>() {
        Ok(full) => {
            let event = store.get(&full)?;
            if event.account_id() != account {
                return Err(StorageError::NotFound(id.to_string()));
            }
            Ok(event)
        }
        Err(_) => store.find_by_prefix(account, id),
    }
}

/// Parse a `key=value` pair.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}
