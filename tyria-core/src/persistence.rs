//! User-data persistence.
//!
//! Each user-state record lives in its own JSON file under a
//! per-install user-data directory. The contract is deliberately
//! forgiving:
//!
//! - missing file → default-constructed record
//! - unreadable/corrupt file → warning logged, default returned
//! - saves are atomic (temp file + rename) so a crash mid-write never
//!   corrupts the previous record
//!
//! Trackers save on every real mutation and once more at shutdown.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{OverlayError, Result};

/// File name of the dungeon user-state record.
pub const DUNGEON_USER_DATA: &str = "dungeons.json";

/// File name of the zone user-state record.
pub const ZONE_USER_DATA: &str = "zones.json";

/// Handle to the per-install user-data directory.
#[derive(Debug, Clone)]
pub struct UserDataStore {
    dir: PathBuf,
}

impl UserDataStore {
    /// Open (or create) the user-data directory at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Io`] when the directory cannot be
    /// created.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "User data store opened");
        Ok(Self { dir })
    }

    /// Load a record by file name, falling back to `T::default()` when
    /// the file is missing or unreadable. Never an error to the caller.
    #[must_use]
    pub fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.dir.join(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = name, "No saved record, starting fresh");
                return T::default();
            }
            Err(e) => {
                warn!(file = name, error = %e, "Failed to read record, using defaults");
                return T::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(file = name, error = %e, "Corrupt record, using defaults");
                T::default()
            }
        }
    }

    /// Save a record atomically under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Serialization`] if encoding fails, or
    /// [`OverlayError::Io`] if the write/rename fails.
    pub fn save<T: Serialize>(&self, value: &T, name: &str) -> Result<()> {
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| OverlayError::Serialization(e.to_string()))?;

        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &path)?;

        debug!(file = name, bytes = json.len(), "Saved record");
        Ok(())
    }

    /// The directory this store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
