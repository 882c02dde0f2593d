//! Persistence layer for affect-core state.
//!
//! Append-only snapshot store over SQLite, a TTL analytics cache, cold
//! backup/restore, retention cleanup, and the [`SessionRuntime`] facade
//! hosts call per interaction.

pub mod backup;
pub mod cache;
pub mod error;
pub mod paths;
pub mod schema;
pub mod session;
pub mod store;

pub use backup::{BackupMeta, backup, restore};
pub use error::{Result, StoreError};
pub use paths::{backups_dir, config_path, db_path, default_base_dir, resolve_base_dir};
pub use session::{ProcessOutcome, SessionRuntime};
pub use store::{CleanupReport, InteractionRecord, SNAPSHOT_FLOOR, Store};
