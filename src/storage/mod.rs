//! Local persistence for the CLI: scan history and the trail catalog.
//!
//! This is client-side history only; the backend owns the real records.

mod json_store;
mod memory;
mod trails;

pub use json_store::JsonScanStore;
pub use memory::MemoryScanStore;
pub use trails::TrailCatalog;

use crate::config::{FertheConfig, StoreType};
use crate::contracts::{QueryOptions, ScanEvent};
use crate::error::{StorageError, StorageResult};
use crate::types::{AccountId, ScanEventId};
use std::cmp::Ordering;
use std::sync::Arc;

/// Storage backend for completed scan events.
pub trait ScanEventStore: Send + Sync {
    /// Persist one completed scan.
    fn append(&self, event: &ScanEvent) -> StorageResult<()>;

    fn get(&self, id: &ScanEventId) -> StorageResult<ScanEvent>;

    /// The single scan of `account_id` whose id starts with `prefix`.
    fn find_by_prefix(&self, account_id: &AccountId, prefix: &str) -> StorageResult<ScanEvent>;

    /// Scans of `account_id`, newest first unless `options` sorts otherwise.
    fn list(
        &self,
        account_id: &AccountId,
        options: Option<&QueryOptions>,
    ) -> StorageResult<Vec<ScanEvent>>;

    /// Remove every stored scan of `account_id`, returning how many were removed.
    fn clear(&self, account_id: &AccountId) -> StorageResult<usize>;
}

/// Pick the one candidate matching a short id prefix.
pub(crate) fn unique_match<T>(prefix: &str, mut candidates: Vec<T>) -> StorageResult<T> {
    match candidates.len() {
        0 => Err(StorageError::NotFound(prefix.to_string())),
        1 => Ok(candidates.remove(0)),
        n => Err(StorageError::Ambiguous {
            prefix: prefix.to_string(),
            matches: n,
        }),
    }
}

/// Open the scan store and trail catalog selected by `STORE_TYPE`.
pub fn open_store(
    config: &FertheConfig,
) -> crate::error::CliResult<(Arc<dyn ScanEventStore>, TrailCatalog)> {
    match config.store_type {
        StoreType::Json => {
            let base = config.store_base_directory()?;
            let scans: Arc<dyn ScanEventStore> = Arc::new(JsonScanStore::open(&base)?);
            Ok((scans, TrailCatalog::open(&base)?))
        }
        StoreType::Memory => {
            let scans: Arc<dyn ScanEventStore> = Arc::new(MemoryScanStore::new());
            Ok((scans, TrailCatalog::in_memory()))
        }
    }
}

/// Apply account filtering, `search` and paging to a list of scans.
///
/// `search` matches against the trail id. Sort keys: `scannedAt`,
/// `radiusUsed`, `clues`; unknown keys leave the default order untouched.
pub(crate) fn filter_events(
    mut events: Vec<ScanEvent>,
    account_id: &AccountId,
    options: Option<&QueryOptions>,
) -> Vec<ScanEvent> {
    events.retain(|e| e.account_id() == account_id);
    events.sort_by(|a, b| b.scanned_at().cmp(&a.scanned_at()));

    let Some(options) = options else {
        return events;
    };

    if let Some(search) = &options.search {
        let needle = search.to_lowercase();
        events.retain(|e| {
            e.trail_id()
                .is_some_and(|t| t.as_str().to_lowercase().contains(&needle))
        });
    }

    options.apply(events, compare_events)
}

fn compare_events(key: &str, a: &ScanEvent, b: &ScanEvent) -> Ordering {
    match key {
        "scannedAt" => a.scanned_at().cmp(&b.scanned_at()),
        "radiusUsed" => a.radius_used().total_cmp(&b.radius_used()),
        "clues" => a.clues().len().cmp(&b.clues().len()),
        _ => Ordering::Equal,
    }
}
