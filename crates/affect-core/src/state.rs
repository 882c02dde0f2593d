//! The affective state value: a small bounded vector of emotions plus
//! meta-cognitive and learning scalars.
//!
//! State is a plain value — created by [`EmotionalState::seed`], transformed
//! only by `engine::update`, and carried through the four-call API. There is
//! no ambient global.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{BASELINE_MAX, BASELINE_MIN, COMPLEX_SEED};
use crate::emotion::{Complex, Primary, Trait};
use crate::time::now_unix_secs;

/// Meta-cognitive parameters, each in [0, 1]. They drift back toward
/// these declared defaults under mean reversion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetaCognitive {
    pub self_awareness: f64,
    pub emotional_volatility: f64,
    pub learning_rate: f64,
    pub reflection_depth: f64,
    pub introspective_tendency: f64,
    pub philosophical_inclination: f64,
}

impl Default for MetaCognitive {
    fn default() -> Self {
        Self {
            self_awareness: 0.7,
            emotional_volatility: 0.4,
            learning_rate: 0.6,
            reflection_depth: 0.8,
            introspective_tendency: 0.6,
            philosophical_inclination: 0.5,
        }
    }
}

/// Smoothed learning scalars. The name is historical — nothing here is a
/// trained model; confidence and accuracy are exponential averages of an
/// optional per-interaction feedback score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MlState {
    pub learning_episodes: u64,
    pub confidence: f64,
    pub prediction_accuracy: f64,
}

impl Default for MlState {
    fn default() -> Self {
        Self {
            learning_episodes: 0,
            confidence: 0.5,
            prediction_accuracy: 0.5,
        }
    }
}

/// Full affective state. Every emotion value is clamped to [0, 1] after
/// every update; primary values are NOT mutually normalized, so overlapping
/// feelings are allowed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    pub primary_emotions: BTreeMap<Primary, f64>,
    pub complex_emotions: BTreeMap<Complex, f64>,
    pub personality_traits: BTreeMap<Trait, f64>,
    pub meta_cognitive_state: MetaCognitive,
    pub ml_state: MlState,
    pub session_id: Uuid,
    /// Unix seconds of the last update.
    pub timestamp: u64,
    pub confidence_score: f64,
}

impl EmotionalState {
    /// Fresh state with personality-derived baselines, stamped now.
    pub fn seed() -> Self {
        Self::seed_at(Uuid::new_v4(), now_unix_secs())
    }

    /// Deterministic seeding for tests and reset.
    pub fn seed_at(session_id: Uuid, now: u64) -> Self {
        let personality_traits: BTreeMap<Trait, f64> = Trait::ALL
            .iter()
            .map(|t| (*t, t.default_value()))
            .collect();

        let primary_emotions: BTreeMap<Primary, f64> = Primary::ALL
            .iter()
            .map(|p| (*p, seed_baseline(*p, &personality_traits)))
            .collect();

        let complex_emotions: BTreeMap<Complex, f64> =
            Complex::ALL.iter().map(|c| (*c, COMPLEX_SEED)).collect();

        Self {
            primary_emotions,
            complex_emotions,
            personality_traits,
            meta_cognitive_state: MetaCognitive::default(),
            ml_state: MlState::default(),
            session_id,
            timestamp: now,
            confidence_score: 0.5,
        }
    }

    /// Reseed after an explicit reset. `preserve_learning` carries the
    /// ml_state forward and blends each personality trait 50/50 with its
    /// default; the session id always rotates.
    pub fn reset(&self, preserve_learning: bool, now: u64) -> Self {
        let mut fresh = Self::seed_at(Uuid::new_v4(), now);
        if preserve_learning {
            fresh.ml_state = self.ml_state.clone();
            for (t, v) in fresh.personality_traits.iter_mut() {
                let old = self.personality_traits.get(t).copied().unwrap_or(*v);
                *v = (old + t.default_value()) / 2.0;
            }
        }
        fresh
    }

    /// Argmax over primaries; ties break toward the earlier declared
    /// variant. `None` only for an (invalid) empty map.
    pub fn dominant_primary(&self) -> Option<(Primary, f64)> {
        argmax(&self.primary_emotions)
    }

    /// Argmax over complex emotions, same tie-break rule.
    pub fn dominant_complex(&self) -> Option<(Complex, f64)> {
        argmax(&self.complex_emotions)
    }
}

/// First-wins argmax: BTreeMap iterates in key (= declaration) order, so a
/// strictly-greater comparison gives the fixed tie-break.
fn argmax<K: Copy + Ord>(map: &BTreeMap<K, f64>) -> Option<(K, f64)> {
    let mut best: Option<(K, f64)> = None;
    for (k, v) in map {
        match best {
            Some((_, bv)) if *v <= bv => {}
            _ => best = Some((*k, *v)),
        }
    }
    best
}

/// Personality-derived seed baseline for a primary emotion, clamped to
/// [BASELINE_MIN, BASELINE_MAX]. These shape only the fresh state; decay
/// pulls toward zero, not back to these.
fn seed_baseline(p: Primary, traits: &BTreeMap<Trait, f64>) -> f64 {
    let t = |tr: Trait| traits.get(&tr).copied().unwrap_or(tr.default_value());

    let raw = match p {
        Primary::Joy => 0.05 + t(Trait::Extraversion) * 0.08 + t(Trait::Openness) * 0.05,
        Primary::Sadness => 0.05 + t(Trait::Neuroticism) * 0.08 - t(Trait::Extraversion) * 0.03,
        Primary::Anger => 0.05 + t(Trait::Neuroticism) * 0.06 - t(Trait::Agreeableness) * 0.04,
        Primary::Fear => 0.05 + t(Trait::Neuroticism) * 0.08 - t(Trait::Conscientiousness) * 0.02,
        Primary::Surprise => 0.05 + t(Trait::Openness) * 0.06 + t(Trait::CuriosityDrive) * 0.04,
        Primary::Disgust => 0.05 + t(Trait::Perfectionism) * 0.05 - t(Trait::Agreeableness) * 0.02,
        Primary::Curiosity => 0.05 + t(Trait::CuriosityDrive) * 0.15 + t(Trait::Openness) * 0.08,
        Primary::Trust => 0.05 + t(Trait::Agreeableness) * 0.08 + t(Trait::Extraversion) * 0.04,
    };

    raw.clamp(BASELINE_MIN, BASELINE_MAX)
}
