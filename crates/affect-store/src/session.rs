//! The four-call surface hosts integrate against: `process`, `get_state`,
//! and the administrative backup/restore/cleanup/reset family.
//!
//! Storage failures degrade rather than abort: a runtime that cannot open
//! or write its store keeps serving from an in-memory state and logs the
//! loss. Only administrative operations insist on a working store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use uuid::Uuid;

use affect_core::{
    EmotionalState, EngineConfig, TriggerVector, analyze, now_unix_secs, render, update,
};

use crate::backup;
use crate::cache;
use crate::error::{Result, StoreError};
use crate::paths;
use crate::store::{CleanupReport, InteractionRecord, Store};

/// Result of one processed interaction.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessOutcome {
    pub state: EmotionalState,
    /// Directive text for the downstream generator; empty means "apply
    /// no modification".
    pub directive: String,
}

pub struct SessionRuntime {
    store: Option<Store>,
    base: Option<PathBuf>,
    config: EngineConfig,
    rng: SmallRng,
    /// Last known state, authoritative while degraded.
    fallback: Option<EmotionalState>,
}

impl SessionRuntime {
    /// Open the runtime over `base_dir`, degrading to memory-only if the
    /// store cannot be opened.
    pub fn open(base_dir: &Path, config: EngineConfig) -> Self {
        let store = fs::create_dir_all(base_dir)
            .map_err(StoreError::from)
            .and_then(|_| Store::open(&paths::db_path(base_dir)));
        let store = match store {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::error!(error = %e, "store unavailable, running degraded");
                None
            }
        };
        Self {
            store,
            base: Some(base_dir.to_path_buf()),
            config,
            rng: SmallRng::from_os_rng(),
            fallback: None,
        }
    }

    /// Memory-backed runtime for tests.
    pub fn in_memory(config: EngineConfig) -> Result<Self> {
        Ok(Self {
            store: Some(Store::open_in_memory()?),
            base: None,
            config,
            rng: SmallRng::seed_from_u64(42),
            fallback: None,
        })
    }

    /// Runtime with no store at all — permanently degraded.
    pub fn degraded(config: EngineConfig) -> Self {
        Self {
            store: None,
            base: None,
            config,
            rng: SmallRng::seed_from_u64(42),
            fallback: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_degraded(&self) -> bool {
        self.store.is_none()
    }

    /// Latest persisted state, the in-memory fallback, or a fresh seed.
    pub fn get_state(&self, session: Option<Uuid>) -> EmotionalState {
        if let Some(store) = &self.store {
            match store.get_latest(session) {
                Ok(Some(state)) => return state,
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "state read failed, using fallback"),
            }
        }
        self.fallback
            .clone()
            .unwrap_or_else(EmotionalState::seed)
    }

    /// Process one interaction: analyze → update → persist → render.
    ///
    /// Persistence failures are logged and the call continues — the
    /// caller always gets a state and a directive.
    pub fn process(
        &mut self,
        text: &str,
        context: &BTreeMap<String, String>,
        feedback: Option<f64>,
    ) -> ProcessOutcome {
        let now = now_unix_secs();
        let current = self.get_state(None);
        let vector = analyze(text, context, &self.config);
        let state = update(&current, &vector, &self.config, feedback, now);

        self.persist(&state, text, &vector, now);
        self.fallback = Some(state.clone());

        let directive = render(&state, &self.config, &mut self.rng);
        ProcessOutcome { state, directive }
    }

    fn persist(&self, state: &EmotionalState, text: &str, vector: &TriggerVector, now: u64) {
        let Some(store) = &self.store else { return };
        if let Err(e) = store.put(state) {
            tracing::warn!(error = %e, "snapshot write failed, continuing degraded");
            return;
        }
        if let Err(e) =
            store.record_interaction(state.session_id, now, text, vector, state.confidence_score)
        {
            tracing::warn!(error = %e, "interaction log write failed");
        }
    }

    /// Recent interaction history via the analytics cache.
    pub fn history(&self, limit: usize) -> Result<Vec<InteractionRecord>> {
        let store = self.require_store()?;
        cache::emotion_history_cached(store, limit, now_unix_secs())
    }

    // --- Administrative ---

    pub fn backup(&self, reason: &str) -> Result<PathBuf> {
        let store = self.require_store()?;
        let base = self.base.as_deref().ok_or_else(|| {
            StoreError::InvalidData("no base directory for backups".to_string())
        })?;
        backup::backup(store, &paths::backups_dir(base), reason, now_unix_secs())
    }

    /// Swap the live database for a backup. On failure the runtime is
    /// left degraded; the on-disk live file is untouched.
    pub fn restore(&mut self, backup_path: &Path) -> Result<()> {
        let store = self.store.take().ok_or_else(|| {
            StoreError::InvalidData("cannot restore a degraded runtime".to_string())
        })?;
        let restored = backup::restore(store, backup_path)?;
        self.store = Some(restored);
        self.fallback = None;
        Ok(())
    }

    pub fn cleanup(&self, retention_days: u32) -> Result<CleanupReport> {
        self.require_store()?.cleanup(retention_days, now_unix_secs())
    }

    /// Reseed the state (rotating the session id) and persist the result.
    pub fn reset(&mut self, preserve_learning: bool) -> EmotionalState {
        let state = self
            .get_state(None)
            .reset(preserve_learning, now_unix_secs());
        if let Some(store) = &self.store {
            if let Err(e) = store.put(&state) {
                tracing::warn!(error = %e, "reset snapshot write failed");
            }
        }
        self.fallback = Some(state.clone());
        state
    }

    fn require_store(&self) -> Result<&Store> {
        self.store.as_ref().ok_or_else(|| {
            StoreError::InvalidData("operation requires a working store".to_string())
        })
    }
}
