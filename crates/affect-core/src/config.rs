//! Flat engine configuration, validated at load.
//!
//! Every field lives in [0, 1]. Out-of-range values are a fatal
//! `ValidationError` — never silently clamped, so a misconfigured file
//! cannot masquerade as a tuned one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tunable parameters for the update algorithm and directive compiler.
/// The three trigger-group weights conventionally sum to 1.0 but that is
/// not enforced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplicative per-update decay applied to every primary emotion.
    pub decay_rate: f64,
    /// Global scale on trigger deltas.
    pub intensity: f64,
    /// Exponential smoothing factor for ml confidence/accuracy feedback.
    pub learning_rate: f64,
    pub user_feedback_weight: f64,
    pub task_complexity_weight: f64,
    pub interaction_patterns_weight: f64,
    /// Minimum dominant-primary intensity before a directive block fires.
    pub primary_threshold: f64,
    /// Minimum dominant-complex intensity before a directive block fires.
    pub complex_threshold: f64,
    /// Minimum self-awareness before the meta-cognitive block is considered.
    pub meta_threshold: f64,
    /// Minimum dominant-complex intensity before an advisory block fires.
    pub advisory_threshold: f64,
    /// Probability that the meta-cognitive sampling gate passes.
    pub introspection_frequency: f64,
    /// Scale on volatility when the predictor draws its noise band.
    pub volatility_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decay_rate: 0.1,
            intensity: 0.7,
            learning_rate: 0.5,
            user_feedback_weight: 0.4,
            task_complexity_weight: 0.3,
            interaction_patterns_weight: 0.3,
            primary_threshold: 0.25,
            complex_threshold: 0.25,
            meta_threshold: 0.5,
            advisory_threshold: 0.3,
            introspection_frequency: 0.3,
            volatility_scale: 0.2,
        }
    }
}

impl EngineConfig {
    /// Reject the first field found outside [0, 1].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("decay_rate", self.decay_rate),
            ("intensity", self.intensity),
            ("learning_rate", self.learning_rate),
            ("user_feedback_weight", self.user_feedback_weight),
            ("task_complexity_weight", self.task_complexity_weight),
            ("interaction_patterns_weight", self.interaction_patterns_weight),
            ("primary_threshold", self.primary_threshold),
            ("complex_threshold", self.complex_threshold),
            ("meta_threshold", self.meta_threshold),
            ("advisory_threshold", self.advisory_threshold),
            ("introspection_frequency", self.introspection_frequency),
            ("volatility_scale", self.volatility_scale),
        ];

        for (name, value) in fields {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(ValidationError {
                    field: name,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Fatal configuration error: a field is outside its allowed range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: &'static str,
    pub value: f64,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "config field '{}' = {} is outside [0, 1]",
            self.field, self.value
        )
    }
}

impl std::error::Error for ValidationError {}
