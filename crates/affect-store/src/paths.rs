//! Storage layout.
//!
//! ```text
//! ~/.affect-engine/
//! ├── affect.db
//! ├── config.toml
//! └── backups/
//!     └── <stamp>-<reason>.db (+ .meta.json)
//! ```

use std::env;
use std::path::{Path, PathBuf};

/// Default base directory for all affect storage.
pub fn default_base_dir() -> PathBuf {
    dirs_home().join(".affect-engine")
}

/// Base directory honoring the `AFFECT_DATA_DIR` override.
pub fn resolve_base_dir() -> PathBuf {
    env::var("AFFECT_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(default_base_dir)
}

pub fn db_path(base: &Path) -> PathBuf {
    base.join("affect.db")
}

pub fn config_path(base: &Path) -> PathBuf {
    base.join("config.toml")
}

pub fn backups_dir(base: &Path) -> PathBuf {
    base.join("backups")
}

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
