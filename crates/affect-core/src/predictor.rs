//! Heuristic short-horizon forecast of the primary emotions.
//!
//! This is a bounded random walk around the current values, not a trained
//! forecast: each primary gets uniform noise proportional to the current
//! emotional volatility, and the reported confidence is simply one minus
//! that volatility. Callers must not over-trust it.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constants::clamp01;
use crate::emotion::Primary;
use crate::state::EmotionalState;

/// One heuristic forecast, serialized as-is for the CLI and hosts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub horizon_minutes: u32,
    pub predicted_emotions: BTreeMap<Primary, f64>,
    /// `1 − emotional_volatility`: a stability report, not model accuracy.
    pub confidence: f64,
}

/// Extrapolate the primaries `horizon_minutes` ahead.
///
/// Each value receives uniform noise in
/// `±(volatility * config.volatility_scale)` and is clamped back to [0, 1].
/// Zero volatility yields the current values unchanged.
pub fn predict(
    state: &EmotionalState,
    horizon_minutes: u32,
    config: &EngineConfig,
    rng: &mut impl Rng,
) -> Forecast {
    let volatility = state.meta_cognitive_state.emotional_volatility;
    let span = volatility * config.volatility_scale;

    let predicted_emotions = state
        .primary_emotions
        .iter()
        .map(|(p, v)| {
            let noise = if span > 0.0 {
                rng.random_range(-span..=span)
            } else {
                0.0
            };
            (*p, clamp01(v + noise))
        })
        .collect();

    Forecast {
        horizon_minutes,
        predicted_emotions,
        confidence: clamp01(1.0 - volatility),
    }
}
