//! Application paths.
//!
//! Resolves XDG-compliant locations for configuration and data.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Configuration directory (~/.config/ferthe)
    pub config_dir: PathBuf,
    /// Data directory (~/.local/share/ferthe)
    pub data_dir: PathBuf,
}

impl Paths {
    /// Resolve the per-user directories, creating them if needed.
    pub fn resolve() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "ferthe", "ferthe").ok_or(ConfigError::DirectoryNotFound)?;

        let paths = Self {
            config_dir: project.config_dir().to_path_buf(),
            data_dir: project.data_dir().to_path_buf(),
        };
        paths.ensure()?;
        Ok(paths)
    }

    /// Root every directory under `base` (used for tests and portable installs).
    pub fn under(base: &Path) -> ConfigResult<Self> {
        let paths = Self {
            config_dir: base.join("config"),
            data_dir: base.join("data"),
        };
        paths.ensure()?;
        Ok(paths)
    }

    fn ensure(&self) -> ConfigResult<()> {
        fs::create_dir_all(&self.config_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Default base directory of the local JSON store.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_base() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::under(dir.path()).unwrap();
        assert!(paths.config_dir.is_dir());
        assert!(paths.data_dir.is_dir());
        assert_eq!(paths.store_dir(), dir.path().join("data").join("store"));
    }
}
