//! Cold backups and stage-then-swap restore.
//!
//! A backup is a plain file copy taken after a full WAL checkpoint, so
//! the copied file is self-contained. Restore never edits the live file
//! in place: the backup is staged next to it and atomically renamed over.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use affect_core::{unix_to_compact_stamp, unix_to_iso8601};

use crate::error::{Result, StoreError};
use crate::store::Store;

/// Sidecar metadata written next to every backup file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackupMeta {
    pub created_at: u64,
    pub created_at_iso: String,
    pub reason: String,
    pub snapshot_count: i64,
    pub interaction_count: i64,
    pub latest_hash: Option<String>,
}

/// Copy the database into `<backups_dir>/<stamp>-<reason>.db` and write a
/// sibling `.meta.json`. Returns the backup path.
pub fn backup(store: &Store, backups_dir: &Path, reason: &str, now: u64) -> Result<PathBuf> {
    let live = store.path().ok_or_else(|| {
        StoreError::InvalidData("in-memory store cannot be backed up".to_string())
    })?;

    // Fold WAL contents into the main file so the copy is complete.
    store
        .conn()
        .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;

    fs::create_dir_all(backups_dir)?;
    let base_stem = format!("{}-{}", unix_to_compact_stamp(now), sanitize_reason(reason));

    // Two backups in the same second with the same reason must not
    // clobber each other.
    let mut stem = base_stem.clone();
    let mut counter = 1u32;
    while backups_dir.join(format!("{stem}.db")).exists() {
        stem = format!("{base_stem}-{counter}");
        counter += 1;
    }
    let backup_path = backups_dir.join(format!("{stem}.db"));
    fs::copy(live, &backup_path)?;

    let meta = BackupMeta {
        created_at: now,
        created_at_iso: unix_to_iso8601(now),
        reason: reason.to_string(),
        snapshot_count: store.snapshot_count()?,
        interaction_count: store.interaction_count()?,
        latest_hash: store.latest_hash()?,
    };
    let meta_json = serde_json::to_string_pretty(&meta)
        .map_err(|e| StoreError::InvalidData(format!("backup metadata: {e}")))?;
    fs::write(backups_dir.join(format!("{stem}.meta.json")), meta_json)?;

    tracing::info!(path = %backup_path.display(), reason, "backup written");
    Ok(backup_path)
}

/// Replace the live database with `backup_path` and reopen.
///
/// Consumes the store so its connection is closed before the swap. The
/// backup is copied to a staging file beside the live one and renamed
/// over it — on failure the live file is untouched.
pub fn restore(store: Store, backup_path: &Path) -> Result<Store> {
    let live = store
        .path()
        .ok_or_else(|| {
            StoreError::InvalidData("in-memory store cannot be restored".to_string())
        })?
        .to_path_buf();

    if !backup_path.is_file() {
        return Err(StoreError::InvalidData(format!(
            "backup not found: {}",
            backup_path.display()
        )));
    }

    let _ = store
        .conn()
        .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);");
    drop(store);

    let staged = live.with_extension("db.staged");
    fs::copy(backup_path, &staged)?;

    // Stale WAL sidecars from the old database must not apply to the new one.
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = live.as_os_str().to_owned();
        sidecar.push(suffix);
        let sidecar = PathBuf::from(sidecar);
        if sidecar.exists() {
            fs::remove_file(&sidecar)?;
        }
    }

    fs::rename(&staged, &live)?;
    tracing::info!(from = %backup_path.display(), "restore complete, reopening");
    Store::open(&live)
}

fn sanitize_reason(reason: &str) -> String {
    let cleaned: String = reason
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "manual".to_string()
    } else {
        cleaned
    }
}
