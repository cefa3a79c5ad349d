//! JSON-based scan history.
//!
//! Stores each scan event as a separate JSON file for simplicity and
//! durability: `<base>/scans/<scan-id>.json`.

use super::{filter_events, unique_match, ScanEventStore};
use crate::contracts::{QueryOptions, ScanEvent};
use crate::error::{StorageError, StorageResult};
use crate::types::{AccountId, ScanEventId};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// JSON file-based scan storage.
#[derive(Debug, Clone)]
pub struct JsonScanStore {
    scans_dir: PathBuf,
}

impl JsonScanStore {
    /// Open (and create if needed) a store under `base_dir`.
    pub fn open(base_dir: &Path) -> StorageResult<Self> {
        let scans_dir = base_dir.join("scans");
        fs::create_dir_all(&scans_dir).map_err(|e| io_error(&scans_dir, e))?;
        Ok(Self { scans_dir })
    }

    /// Load a scan event by ID.
    pub fn load(&self, id: &ScanEventId) -> StorageResult<ScanEvent> {
        let file = self.scan_file(id);

        if !file.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let content = fs::read_to_string(&file).map_err(|e| io_error(&file, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// List all stored scan IDs.
    pub fn list_ids(&self) -> StorageResult<Vec<ScanEventId>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.scans_dir).map_err(|e| io_error(&self.scans_dir, e))? {
            let entry = entry.map_err(|e| io_error(&self.scans_dir, e))?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem() {
                    if let Ok(id) = stem.to_string_lossy().parse::<ScanEventId>() {
                        ids.push(id);
                    }
                }
            }
        }

        Ok(ids)
    }

    fn load_all(&self) -> StorageResult<Vec<ScanEvent>> {
        let mut events = Vec::new();
        for id in self.list_ids()? {
            match self.load(&id) {
                Ok(event) => events.push(event),
                Err(e) => warn!(scan = %id, error = %e, "skipping unreadable scan file"),
            }
        }
        Ok(events)
    }

    /// Get the file path for a scan event.
    fn scan_file(&self, id: &ScanEventId) -> PathBuf {
        self.scans_dir.join(format!("{}.json", id))
    }
}

impl ScanEventStore for JsonScanStore {
    fn append(&self, event: &ScanEvent) -> StorageResult<()> {
        let file = self.scan_file(&event.id());
        let content = serde_json::to_string_pretty(event)?;
        fs::write(&file, content).map_err(|e| io_error(&file, e))?;
        debug!(scan = %event.id(), path = %file.display(), "scan event saved");
        Ok(())
    }

    fn get(&self, id: &ScanEventId) -> StorageResult<ScanEvent> {
        self.load(id)
    }

    fn find_by_prefix(&self, account_id: &AccountId, prefix: &str) -> StorageResult<ScanEvent> {
        let matches = self
            .load_all()?
            .into_iter()
            .filter(|e| e.account_id() == account_id && e.id().to_string().starts_with(prefix))
            .collect();
        unique_match(prefix, matches)
    }

    fn list(
        &self,
        account_id: &AccountId,
        options: Option<&QueryOptions>,
    ) -> StorageResult<Vec<ScanEvent>> {
        Ok(filter_events(self.load_all()?, account_id, options))
    }

    fn clear(&self, account_id: &AccountId) -> StorageResult<usize> {
        let mut removed = 0;
        for event in self.load_all()? {
            if event.account_id() != account_id {
                continue;
            }
            let file = self.scan_file(&event.id());
            fs::remove_file(&file).map_err(|e| io_error(&file, e))?;
            removed += 1;
        }
        debug!(account = %account_id, removed, "scan history cleared");
        Ok(removed)
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{parse_query_options, ScanRequest};
    use crate::types::{GeoLocation, TrailId};

    fn event(account: &str) -> ScanEvent {
        let request = ScanRequest::new(
            AccountId::new(account).unwrap(),
            Some(TrailId::new("trail").unwrap()),
        );
        ScanEvent::record(&request, GeoLocation::new(10.0, 10.0).unwrap(), 500.0, vec![])
    }

    #[test]
    fn test_append_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScanStore::open(dir.path()).unwrap();
        let scan = event("acc");
        store.append(&scan).unwrap();

        assert_eq!(store.get(&scan.id()).unwrap(), scan);
        assert!(dir.path().join("scans").join(format!("{}.json", scan.id())).exists());
    }

    #[test]
    fn test_list_filters_by_account_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScanStore::open(dir.path()).unwrap();
        let first = event("acc");
        let other = event("someone-else");
        let second = event("acc");
        for e in [&first, &other, &second] {
            store.append(e).unwrap();
        }

        let account = AccountId::new("acc").unwrap();
        let listed = store.list(&account, None).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].scanned_at() >= listed[1].scanned_at());

        let options = parse_query_options([("limit", "1")]).unwrap();
        assert_eq!(store.list(&account, Some(&options)).unwrap().len(), 1);
    }

    #[test]
    fn test_find_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScanStore::open(dir.path()).unwrap();
        let scan = event("acc");
        store.append(&scan).unwrap();

        let account = AccountId::new("acc").unwrap();
        assert_eq!(store.find_by_prefix(&account, &scan.id().short()).unwrap(), scan);
        assert!(matches!(
            store.find_by_prefix(&account, "zzzz"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_unreadable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScanStore::open(dir.path()).unwrap();
        store.append(&event("acc")).unwrap();
        let broken = ScanEventId::new();
        fs::write(dir.path().join("scans").join(format!("{broken}.json")), "{not json").unwrap();

        let listed = store.list(&AccountId::new("acc").unwrap(), None).unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_find_by_prefix_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScanStore::open(dir.path()).unwrap();
        store.append(&event("acc")).unwrap();
        store.append(&event("acc")).unwrap();
        let other = event("someone-else");
        store.append(&other).unwrap();

        let account = AccountId::new("acc").unwrap();
        assert!(matches!(
            store.find_by_prefix(&account, ""),
            Err(StorageError::Ambiguous { matches: 2, .. })
        ));
        let theirs = AccountId::new("someone-else").unwrap();
        assert_eq!(store.find_by_prefix(&theirs, "").unwrap(), other);
    }

    #[test]
    fn test_clear_only_removes_one_account() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScanStore::open(dir.path()).unwrap();
        store.append(&event("acc")).unwrap();
        store.append(&event("acc")).unwrap();
        let other = event("someone-else");
        store.append(&other).unwrap();

        assert_eq!(store.clear(&AccountId::new("acc").unwrap()).unwrap(), 2);
        assert_eq!(store.list_ids().unwrap(), vec![other.id()]);
    }
}
