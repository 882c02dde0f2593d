//! Affective state engine.
//!
//! Maintains a small, bounded numeric emotional state updated from
//! free-text interactions: trigger analysis, decay, blending, clamping,
//! dominance selection, and a deterministic state→directive compiler for
//! a downstream text generator. A heuristic predictor extrapolates the
//! primaries over short horizons.
//!
//! Zero I/O — pure state math with no opinions about persistence or
//! transport; snapshots and sessions live in `affect-store`.

pub mod config;
pub mod constants;
pub mod director;
pub mod emotion;
pub mod engine;
pub mod predictor;
pub mod state;
pub mod time;
pub mod trigger;

pub use config::{EngineConfig, ValidationError};
pub use constants::{
    BASELINE_MAX, BASELINE_MIN, COMPLEX_SEED, EPSILON, REVERSION_RATE, VOLATILITY_GAIN, clamp01,
};
pub use director::render;
pub use emotion::{Complex, Primary, Trait};
pub use engine::{simulate_update, update};
pub use predictor::{Forecast, predict};
pub use state::{EmotionalState, MetaCognitive, MlState};
pub use time::{now_iso8601, now_unix_secs, unix_to_compact_stamp, unix_to_iso8601};
pub use trigger::{TriggerVector, analyze};
