//! The state update algorithm: decay, blend, clamp, recompose, select.
//!
//! `update` is a pure function — identical inputs always yield identical
//! outputs. The caller supplies the clock; randomness never appears here
//! (prediction and directive sampling live elsewhere).

use crate::config::EngineConfig;
use crate::constants::{REVERSION_RATE, VOLATILITY_GAIN, clamp01};
use crate::emotion::Complex;
use crate::state::{EmotionalState, MetaCognitive};
use crate::trigger::TriggerVector;

/// Produce the next state from the current one and a trigger vector.
///
/// Steps, in order:
/// 1. decay + blend + clamp each primary emotion
/// 2. recompute complex emotions from the static composition table
/// 3. meta-cognitive mean reversion (volatility also tracks the change)
/// 4. personality drift toward defaults
/// 5. ml smoothing from the optional feedback score
/// 6. advance the timestamp, recompute the confidence score
///
/// An empty vector still decays every primary toward zero. `session_id`
/// is unchanged; rotation happens only through reset.
pub fn update(
    state: &EmotionalState,
    vector: &TriggerVector,
    config: &EngineConfig,
    feedback: Option<f64>,
    now: u64,
) -> EmotionalState {
    update_inner(state, vector, config, feedback, now, false)
}

/// Administrative variant: applies the same algorithm but pins the
/// meta-cognitive parameters (no mean reversion), used by simulate and
/// introspection tooling that wants to hold the lens still.
pub fn simulate_update(
    state: &EmotionalState,
    vector: &TriggerVector,
    config: &EngineConfig,
    feedback: Option<f64>,
    now: u64,
) -> EmotionalState {
    update_inner(state, vector, config, feedback, now, true)
}

fn update_inner(
    state: &EmotionalState,
    vector: &TriggerVector,
    config: &EngineConfig,
    feedback: Option<f64>,
    now: u64,
    pin_meta: bool,
) -> EmotionalState {
    let mut next = state.clone();

    // 1. Primary emotions: multiplicative decay toward zero, then the
    // trigger delta, then the clamp.
    let mut total_change = 0.0;
    for (p, value) in next.primary_emotions.iter_mut() {
        let old = *value;
        *value = clamp01(old * (1.0 - config.decay_rate) + vector.get(*p));
        total_change += (*value - old).abs();
    }

    // 2. Complex emotions are derived, never directly triggered.
    for c in Complex::ALL {
        let combined: f64 = c
            .components()
            .iter()
            .map(|(p, w)| w * next.primary_emotions.get(p).copied().unwrap_or(0.0))
            .sum();
        next.complex_emotions.insert(c, clamp01(c.weight() * combined));
    }

    // 3. Meta-cognitive drift. Volatility first absorbs the observed
    // change, then everything reverts toward its default.
    if !pin_meta {
        let meta = &mut next.meta_cognitive_state;
        meta.emotional_volatility =
            clamp01(meta.emotional_volatility + total_change * VOLATILITY_GAIN);
        revert_meta(meta);
    }

    // 4. Personality traits drift slowly toward their defaults.
    for (t, v) in next.personality_traits.iter_mut() {
        *v = clamp01(*v + REVERSION_RATE * (t.default_value() - *v));
    }

    // 5. Learning scalars.
    next.ml_state.learning_episodes = next.ml_state.learning_episodes.saturating_add(1);
    if let Some(score) = feedback {
        let score = clamp01(score);
        let alpha = config.learning_rate;
        next.ml_state.confidence += alpha * (score - next.ml_state.confidence);
        next.ml_state.prediction_accuracy += alpha * (score - next.ml_state.prediction_accuracy);
    }

    // 6. Stamp and score.
    next.timestamp = now;
    next.confidence_score = confidence_score(&next);
    next
}

fn revert_meta(meta: &mut MetaCognitive) {
    let defaults = MetaCognitive::default();
    let step = |v: f64, d: f64| clamp01(v + REVERSION_RATE * (d - v));
    meta.self_awareness = step(meta.self_awareness, defaults.self_awareness);
    meta.emotional_volatility = step(meta.emotional_volatility, defaults.emotional_volatility);
    meta.learning_rate = step(meta.learning_rate, defaults.learning_rate);
    meta.reflection_depth = step(meta.reflection_depth, defaults.reflection_depth);
    meta.introspective_tendency =
        step(meta.introspective_tendency, defaults.introspective_tendency);
    meta.philosophical_inclination = step(
        meta.philosophical_inclination,
        defaults.philosophical_inclination,
    );
}

/// Overall confidence: stability and learned confidence, averaged.
fn confidence_score(state: &EmotionalState) -> f64 {
    let meta = &state.meta_cognitive_state;
    let factors = [
        meta.self_awareness,
        state.ml_state.confidence,
        1.0 - meta.emotional_volatility,
    ];
    factors.iter().sum::<f64>() / factors.len() as f64
}
