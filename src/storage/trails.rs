//! Trail catalog backed by `<base>/trails/<trail-id>.json`.

use crate::contracts::Trail;
use crate::error::{StorageError, StorageResult};
use crate::types::TrailId;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

/// Trails known to this client, keyed by id.
#[derive(Debug)]
pub struct TrailCatalog {
    trails_dir: Option<PathBuf>,
    trails: RwLock<BTreeMap<TrailId, Trail>>,
}

impl TrailCatalog {
    /// A catalog that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            trails_dir: None,
            trails: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load every trail file under `<base_dir>/trails`.
    pub fn open(base_dir: &Path) -> StorageResult<Self> {
        let trails_dir = base_dir.join("trails");
        fs::create_dir_all(&trails_dir).map_err(|e| io_error(&trails_dir, e))?;

        let mut trails = BTreeMap::new();
        let entries = fs::read_dir(&trails_dir).map_err(|e| io_error(&trails_dir, e))?;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match read_trail(&path) {
                Ok(trail) if path.file_stem() == Some(OsStr::new(trail.id.as_str())) => {
                    trails.insert(trail.id.clone(), trail);
                }
                Ok(trail) => warn!(
                    path = %path.display(),
                    trail = %trail.id,
                    "skipping trail file not named after its id"
                ),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping trail file"),
            }
        }
        debug!(count = trails.len(), dir = %trails_dir.display(), "trail catalog loaded");

        Ok(Self {
            trails_dir: Some(trails_dir),
            trails: RwLock::new(trails),
        })
    }

    /// Add or replace a trail, persisting it when the catalog is disk-backed.
    pub fn insert(&self, trail: Trail) -> StorageResult<()> {
        if let Some(dir) = &self.trails_dir {
            let file = dir.join(format!("{}.json", file_stem(&trail.id)?));
            let content = serde_json::to_string_pretty(&trail)?;
            fs::write(&file, content).map_err(|e| io_error(&file, e))?;
        }
        let mut trails = self.trails.write().map_err(|_| StorageError::Poisoned)?;
        trails.insert(trail.id.clone(), trail);
        Ok(())
    }

    /// Read a trail from a JSON file and add it to the catalog.
    pub fn import(&self, path: &Path) -> StorageResult<Trail> {
        let trail = read_trail(path)?;
        self.insert(trail.clone())?;
        Ok(trail)
    }

    pub fn get(&self, id: &TrailId) -> StorageResult<Option<Trail>> {
        let trails = self.trails.read().map_err(|_| StorageError::Poisoned)?;
        Ok(trails.get(id).cloned())
    }

    /// All trails ordered by id.
    pub fn list(&self) -> StorageResult<Vec<Trail>> {
        let trails = self.trails.read().map_err(|_| StorageError::Poisoned)?;
        Ok(trails.values().cloned().collect())
    }
}

fn read_trail(path: &Path) -> StorageResult<Trail> {
    let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// The id itself, as long as it names a plain file inside the trails directory.
fn file_stem(id: &TrailId) -> StorageResult<&str> {
    let stem = id.as_str();
    let unsafe_name = stem.starts_with('.')
        || stem.contains(['/', '\\', '\0'])
        || stem.contains("..");
    if unsafe_name {
        return Err(StorageError::InvalidFileName(stem.to_string()));
    }
    Ok(stem)
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
    use crate::contracts::Spot;
    use crate::types::{GeoLocation, SpotId};

    fn sample(id: &str, name: &str) -> Trail {
        Trail::from_spots(
            TrailId::new(id).unwrap(),
            name,
            vec![Spot::new(
                SpotId::new("s-1").unwrap(),
                "Old Mill",
                GeoLocation::new(52.0, 13.0).unwrap(),
            )],
        )
        .unwrap()
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir.join("trails"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_insert_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TrailCatalog::open(dir.path()).unwrap();
        let original = sample("t-1", "River Bend");
        catalog.insert(original.clone()).unwrap();
        assert_eq!(file_names(dir.path()), vec!["t-1.json"]);

        let reopened = TrailCatalog::open(dir.path()).unwrap();
        let trail = reopened.get(&TrailId::new("t-1").unwrap()).unwrap().unwrap();
        assert_eq!(trail, original);
        assert_eq!(reopened.list().unwrap().len(), 1);
    }

    #[test]
    fn test_same_name_trails_both_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TrailCatalog::open(dir.path()).unwrap();
        catalog.insert(sample("t-1", "River Bend")).unwrap();
        catalog.insert(sample("t-2", "River Bend")).unwrap();
        assert_eq!(catalog.list().unwrap().len(), 2);

        let reopened = TrailCatalog::open(dir.path()).unwrap();
        assert_eq!(reopened.list().unwrap().len(), 2);
    }

    #[test]
    fn test_renamed_trail_replaces_its_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TrailCatalog::open(dir.path()).unwrap();
        catalog.insert(sample("t-1", "Old Name")).unwrap();
        catalog.insert(sample("t-1", "New Name")).unwrap();
        assert_eq!(file_names(dir.path()), vec!["t-1.json"]);

        let reopened = TrailCatalog::open(dir.path()).unwrap();
        let trail = reopened.get(&TrailId::new("t-1").unwrap()).unwrap().unwrap();
        assert_eq!(trail.name, "New Name");
    }

    #[test]
    fn test_ids_unsafe_as_file_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TrailCatalog::open(dir.path()).unwrap();
        for id in ["../escape", "a/b", "a\\b", "..", ".hidden"] {
            assert!(
                matches!(
                    catalog.insert(sample(id, "Bad")),
                    Err(StorageError::InvalidFileName(_))
                ),
                "{id} accepted"
            );
        }
        assert!(catalog.list().unwrap().is_empty());

        // Memory catalogs never touch the disk, so any id is fine there.
        let memory = TrailCatalog::in_memory();
        memory.insert(sample("a/b", "Fine")).unwrap();
    }

    #[test]
    fn test_in_memory_catalog() {
        let catalog = TrailCatalog::in_memory();
        assert!(catalog.get(&TrailId::new("t-1").unwrap()).unwrap().is_none());
        catalog.insert(sample("t-1", "River Bend")).unwrap();
        assert!(catalog.get(&TrailId::new("t-1").unwrap()).unwrap().is_some());
    }

    #[test]
    fn test_invalid_trail_files_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("trails")).unwrap();
        fs::write(dir.path().join("trails").join("bad.json"), "[]").unwrap();
        let catalog = TrailCatalog::open(dir.path()).unwrap();
        assert!(catalog.list().unwrap().is_empty());
    }

    fn import_json(json: &str) -> StorageResult<Trail> {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("import.json");
        fs::write(&file, json).unwrap();
        TrailCatalog::in_memory().import(&file)
    }

    fn trail_json(id: &str, north_east: (f64, f64), spot: (f64, f64)) -> String {
        serde_json::json!({
            "id": id,
            "slug": "river-bend",
            "name": "River Bend",
            "boundary": {
                "northEast": { "lat": north_east.0, "lon": north_east.1 },
                "southWest": { "lat": 52.0, "lon": 13.0 }
            },
            "spots": [{
                "id": "s-1",
                "slug": "old-mill",
                "name": "Old Mill",
                "location": { "lat": spot.0, "lon": spot.1 },
                "createdAt": "2026-01-01T00:00:00Z"
            }],
            "options": { "scannerRadius": 500.0, "discoveryRadius": 25.0 }
        })
        .to_string()
    }

    #[test]
    fn test_import_valid_trail() {
        let trail = import_json(&trail_json("t-1", (52.1, 13.1), (52.05, 13.05))).unwrap();
        assert_eq!(trail.id.as_str(), "t-1");
        assert_eq!(trail.spots.len(), 1);
    }

    #[test]
    fn test_import_rejects_empty_id() {
        let err = import_json(&trail_json("  ", (52.1, 13.1), (52.05, 13.05))).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_import_rejects_out_of_range_coordinates() {
        let err = import_json(&trail_json("t-1", (200.0, 13.1), (52.05, 13.05))).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));

        let err = import_json(&trail_json("t-1", (52.1, 13.1), (52.05, 190.0))).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_import_rejects_inverted_boundary() {
        let err = import_json(&trail_json("t-1", (51.0, 12.0), (52.05, 13.05))).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
