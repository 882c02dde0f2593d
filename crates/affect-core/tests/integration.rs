//! Integration tests exercising the full affect pipeline:
//! analyze → update → render → predict, across module boundaries.

use std::collections::BTreeMap;

use affect_core::{
    EmotionalState, EngineConfig, Primary, TriggerVector, analyze, predict, render, update,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use uuid::Uuid;

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

fn no_context() -> BTreeMap<String, String> {
    BTreeMap::new()
}

const PRAISE: &str = "thanks, that was excellent work - the fix is perfect";
const SETBACK: &str = "the deploy failed again and now everything is broken";

/// A run of praise pushes joy up, produces a non-empty directive, and a
/// later run of silence decays the state back below the thresholds.
#[test]
fn praise_then_silence_roundtrip() {
    let config = EngineConfig::default();
    let mut state = EmotionalState::seed_at(Uuid::nil(), 1_700_000_000);
    let mut now = 1_700_000_000u64;

    for _ in 0..8 {
        now += 60;
        let vector = analyze(PRAISE, &no_context(), &config);
        assert!(!vector.is_empty());
        state = update(&state, &vector, &config, Some(0.9), now);
    }
    let (dominant, intensity) = state.dominant_primary().unwrap();
    assert_eq!(dominant, Primary::Joy);
    assert!(intensity > config.primary_threshold);

    let mut no_meta = config.clone();
    no_meta.introspection_frequency = 0.0;
    let directive = render(&state, &no_meta, &mut rng());
    assert!(directive.contains("positive energy"));
    assert!(directive.contains("factual content is unaffected"));

    // Silence: the empty vector decays everything below the gates.
    let empty = TriggerVector::new();
    for _ in 0..60 {
        now += 60;
        state = update(&state, &empty, &config, None, now);
    }
    let directive = render(&state, &no_meta, &mut rng());
    assert_eq!(directive, "");
}

/// Negative interactions raise volatility, which widens the forecast
/// noise band and lowers reported confidence.
#[test]
fn setbacks_lower_forecast_confidence() {
    let config = EngineConfig::default();
    let mut state = EmotionalState::seed_at(Uuid::nil(), 1_700_000_000);

    let calm = predict(&state, 30, &config, &mut rng());

    for i in 0..10 {
        let vector = analyze(SETBACK, &no_context(), &config);
        state = update(&state, &vector, &config, Some(0.1), 1_700_000_000 + i);
    }
    let shaken = predict(&state, 30, &config, &mut rng());

    assert!(shaken.confidence < calm.confidence);
    assert!(state.ml_state.confidence < 0.5);
}

/// Every value stays in [0, 1] under a long adversarial mix of inputs.
#[test]
fn bounds_hold_under_mixed_load() {
    let config = EngineConfig::default();
    let mut state = EmotionalState::seed_at(Uuid::nil(), 1_700_000_000);
    let texts = [PRAISE, SETBACK, "this is complex and fascinating", "whatever"];

    for (i, text) in texts.iter().cycle().take(200).enumerate() {
        let vector = analyze(text, &no_context(), &config);
        let feedback = if i % 3 == 0 { Some(1.0) } else { None };
        state = update(&state, &vector, &config, feedback, 1_700_000_000 + i as u64);

        for v in state
            .primary_emotions
            .values()
            .chain(state.complex_emotions.values())
            .chain(state.personality_traits.values())
        {
            assert!((0.0..=1.0).contains(v), "value escaped bounds: {v}");
        }
        assert!((0.0..=1.0).contains(&state.confidence_score));
    }
    assert_eq!(state.ml_state.learning_episodes, 200);
}

mod prop {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Arbitrary deltas, feedback, and decay never push any value
        /// outside [0, 1].
        #[test]
        fn update_clamps_arbitrary_vectors(
            deltas in proptest::collection::vec(-10.0f64..10.0, 8),
            feedback in proptest::option::of(0.0f64..=1.0),
            decay in 0.0f64..=1.0,
        ) {
            let mut config = EngineConfig::default();
            config.decay_rate = decay;

            let mut vector = TriggerVector::new();
            for (p, d) in Primary::ALL.iter().zip(deltas) {
                vector.add(*p, d);
            }

            let state = EmotionalState::seed_at(Uuid::nil(), 1_700_000_000);
            let next = update(&state, &vector, &config, feedback, 1_700_000_001);

            for v in next
                .primary_emotions
                .values()
                .chain(next.complex_emotions.values())
            {
                prop_assert!((0.0..=1.0).contains(v));
            }
            prop_assert!((0.0..=1.0).contains(&next.ml_state.confidence));
        }
    }
}

/// Snapshot JSON written by one version of the state survives a reload.
#[test]
fn state_serde_roundtrip_through_pipeline() {
    let config = EngineConfig::default();
    let vector = analyze(PRAISE, &no_context(), &config);
    let state = update(
        &EmotionalState::seed_at(Uuid::nil(), 1_700_000_000),
        &vector,
        &config,
        Some(0.8),
        1_700_000_060,
    );

    let json = serde_json::to_string_pretty(&state).unwrap();
    let back: EmotionalState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
    assert_eq!(back.dominant_primary(), state.dominant_primary());
}
