//! In-memory scan history.
//!
//! Useful for tests and for `STORE_TYPE=memory`, where nothing should touch
//! the disk.

use super::{filter_events, unique_match, ScanEventStore};
use crate::contracts::{QueryOptions, ScanEvent};
use crate::error::{StorageError, StorageResult};
use crate::types::{AccountId, ScanEventId};
use std::sync::RwLock;

/// In-memory scan storage.
#[derive(Debug, Default)]
pub struct MemoryScanStore {
    events: RwLock<Vec<ScanEvent>>,
}

impl MemoryScanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScanEventStore for MemoryScanStore {
    fn append(&self, event: &ScanEvent) -> StorageResult<()> {
        let mut events = self.events.write().map_err(|_| StorageError::Poisoned)?;
        events.push(event.clone());
        Ok(())
    }

    fn get(&self, id: &ScanEventId) -> StorageResult<ScanEvent> {
        let events = self.events.read().map_err(|_| StorageError::Poisoned)?;
        events
            .iter()
            .find(|e| &e.id() == id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    fn find_by_prefix(&self, account_id: &AccountId, prefix: &str) -> StorageResult<ScanEvent> {
        let events = self.events.read().map_err(|_| StorageError::Poisoned)?;
        let matches = events
            .iter()
            .filter(|e| e.account_id() == account_id && e.id().to_string().starts_with(prefix))
            .cloned()
            .collect();
        unique_match(prefix, matches)
    }

    fn list(
        &self,
        account_id: &AccountId,
        options: Option<&QueryOptions>,
    ) -> StorageResult<Vec<ScanEvent>> {
        let events = self.events.read().map_err(|_| StorageError::Poisoned)?;
        Ok(filter_events(events.clone(), account_id, options))
    }

    fn clear(&self, account_id: &AccountId) -> StorageResult<usize> {
        let mut events = self.events.write().map_err(|_| StorageError::Poisoned)?;
        let before = events.len();
        events.retain(|e| e.account_id() != account_id);
        Ok(before - events.len())
    }
}
