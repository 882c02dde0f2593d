//! Turns interaction text/context into a bounded vector of emotion deltas.
//!
//! Matching is deterministic, case-insensitive substring matching against
//! fixed category word-lists. A category fires at most once per call no
//! matter how many of its words appear, so verbose input cannot produce
//! runaway intensity. No matches → empty vector; the engine still decays.

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::emotion::Primary;

/// Ephemeral mapping of primary emotion → delta for one interaction.
/// Never persisted on its own — only folded into the next snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriggerVector {
    deltas: BTreeMap<Primary, f64>,
}

impl TriggerVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, p: Primary) -> f64 {
        self.deltas.get(&p).copied().unwrap_or(0.0)
    }

    /// Accumulate a delta for a known emotion.
    pub fn add(&mut self, p: Primary, delta: f64) {
        *self.deltas.entry(p).or_insert(0.0) += delta;
    }

    /// Boundary entry point for string-keyed callers: unknown identifiers
    /// are dropped with a warning instead of reaching the engine.
    pub fn add_named(&mut self, name: &str, delta: f64) {
        match Primary::parse(name) {
            Some(p) => self.add(p, delta),
            None => tracing::warn!("dropping unknown emotion identifier '{name}'"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Primary, f64)> + '_ {
        self.deltas.iter().map(|(p, d)| (*p, *d))
    }
}

/// Trigger category: a word list, the emotion deltas it contributes, and
/// which configured group weight scales it.
struct Category {
    words: &'static [&'static str],
    deltas: &'static [(Primary, f64)],
    group: Group,
}

#[derive(Clone, Copy)]
enum Group {
    UserFeedback,
    TaskComplexity,
    InteractionPatterns,
}

impl Group {
    fn weight(self, config: &EngineConfig) -> f64 {
        match self {
            Group::UserFeedback => config.user_feedback_weight,
            Group::TaskComplexity => config.task_complexity_weight,
            Group::InteractionPatterns => config.interaction_patterns_weight,
        }
    }
}

static POSITIVE_FEEDBACK: Category = Category {
    words: &[
        "thanks", "thank you", "great", "excellent", "perfect", "awesome", "amazing",
        "wonderful", "brilliant", "fantastic", "well done", "impressive", "helpful",
        "useful", "spot on", "kudos", "superb", "outstanding",
    ],
    deltas: &[(Primary::Joy, 0.3), (Primary::Trust, 0.15)],
    group: Group::UserFeedback,
};

static NEGATIVE_FEEDBACK: Category = Category {
    words: &[
        "wrong", "incorrect", "terrible", "awful", "horrible", "useless", "worthless",
        "garbage", "stupid", "misleading", "sloppy", "messed up", "botched",
        "pathetic", "unreliable", "incompetent",
    ],
    deltas: &[
        (Primary::Sadness, 0.2),
        (Primary::Anger, 0.2),
        (Primary::Trust, -0.1),
    ],
    group: Group::UserFeedback,
};

static COMPLEXITY: Category = Category {
    words: &[
        "multiple steps", "complex", "complicated", "difficult", "challenging",
        "intricate", "elaborate", "sophisticated", "advanced", "technical",
        "nuanced", "tricky", "puzzling", "demanding", "thorny",
    ],
    deltas: &[(Primary::Curiosity, 0.3), (Primary::Surprise, 0.1)],
    group: Group::TaskComplexity,
};

static SUCCESS: Category = Category {
    words: &[
        "solved", "completed", "finished", "success", "working now", "fixed",
        "resolved", "accomplished", "achieved", "implemented", "delivered",
        "optimized", "mastered",
    ],
    deltas: &[(Primary::Joy, 0.25), (Primary::Trust, 0.1)],
    group: Group::TaskComplexity,
};

static FAILURE: Category = Category {
    words: &[
        "failed", "failure", "error", "broken", "stuck", "can't", "unable",
        "impossible", "doesn't work", "not working", "crashed", "glitch",
        "deadlock", "dead end",
    ],
    deltas: &[
        (Primary::Anger, 0.2),
        (Primary::Fear, 0.15),
        (Primary::Sadness, 0.1),
    ],
    group: Group::TaskComplexity,
};

static ENGAGEMENT: Category = Category {
    words: &[
        "tell me more", "explain", "how does", "what if", "interesting",
        "continue", "elaborate", "clarify", "describe", "demonstrate",
        "explore", "investigate", "dive deeper", "fascinating",
    ],
    deltas: &[(Primary::Curiosity, 0.25), (Primary::Joy, 0.1)],
    group: Group::InteractionPatterns,
};

static DISENGAGEMENT: Category = Category {
    words: &[
        "whatever", "never mind", "skip it", "don't care", "boring",
        "uninterested", "indifferent", "apathetic", "dismissive", "tedious",
        "dull", "not interested",
    ],
    deltas: &[(Primary::Sadness, 0.15), (Primary::Curiosity, -0.2)],
    group: Group::InteractionPatterns,
};

static CATEGORIES: &[&Category] = &[
    &POSITIVE_FEEDBACK,
    &NEGATIVE_FEEDBACK,
    &COMPLEXITY,
    &SUCCESS,
    &FAILURE,
    &ENGAGEMENT,
    &DISENGAGEMENT,
];

/// Analyze one interaction into a trigger vector.
///
/// `context` is a flat key→value map supplied by the host; a
/// `task_outcome` key valued `success` or `failure` counts as a match for
/// the corresponding category even when the text says nothing.
pub fn analyze(
    text: &str,
    context: &BTreeMap<String, String>,
    config: &EngineConfig,
) -> TriggerVector {
    let lower = text.to_lowercase();
    let outcome = context.get("task_outcome").map(String::as_str);

    let mut vector = TriggerVector::new();
    for category in CATEGORIES {
        let text_hit = category.words.iter().any(|w| lower.contains(w));
        let context_hit = match outcome {
            Some("success") => std::ptr::eq(*category, &SUCCESS),
            Some("failure") => std::ptr::eq(*category, &FAILURE),
            _ => false,
        };
        if !(text_hit || context_hit) {
            continue;
        }

        // One contribution per category regardless of hit count.
        let scale = category.group.weight(config) * config.intensity;
        for (emotion, delta) in category.deltas {
            vector.add(*emotion, delta * scale);
        }
    }

    if !vector.is_empty() {
        tracing::debug!(deltas = ?vector, "trigger analysis produced deltas");
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    fn no_context() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    #[test]
    fn test_no_match_is_empty() {
        let v = analyze("the sky is blue today", &no_context(), &cfg());
        assert!(v.is_empty());
    }

    #[test]
    fn test_positive_feedback_deltas() {
        let v = analyze("thanks, that was perfect", &no_context(), &cfg());
        // 0.3 * user_feedback_weight(0.4) * intensity(0.7)
        let expected = 0.3 * 0.4 * 0.7;
        assert!((v.get(Primary::Joy) - expected).abs() < 1e-10);
        assert!(v.get(Primary::Trust) > 0.0);
    }

    #[test]
    fn test_category_fires_at_most_once() {
        let once = analyze("great", &no_context(), &cfg());
        let many = analyze(
            "great excellent perfect awesome amazing wonderful brilliant",
            &no_context(),
            &cfg(),
        );
        assert_eq!(once, many);
    }

    #[test]
    fn test_distinct_categories_accumulate() {
        let v = analyze("thanks, but the build failed", &no_context(), &cfg());
        // positive feedback raises trust, failure does not touch it
        assert!(v.get(Primary::Trust) > 0.0);
        assert!(v.get(Primary::Anger) > 0.0);
        assert!(v.get(Primary::Fear) > 0.0);
    }

    #[test]
    fn test_negative_feedback_lowers_trust() {
        let v = analyze("this is wrong and useless", &no_context(), &cfg());
        assert!(v.get(Primary::Trust) < 0.0);
        assert!(v.get(Primary::Sadness) > 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        let lower = analyze("well done", &no_context(), &cfg());
        let upper = analyze("WELL DONE", &no_context(), &cfg());
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_context_outcome_matches_without_text() {
        let mut ctx = BTreeMap::new();
        ctx.insert("task_outcome".to_string(), "failure".to_string());
        let v = analyze("quiet message", &ctx, &cfg());
        assert!(v.get(Primary::Anger) > 0.0);
    }

    #[test]
    fn test_context_outcome_does_not_double_fire() {
        let mut ctx = BTreeMap::new();
        ctx.insert("task_outcome".to_string(), "success".to_string());
        let text_only = analyze("solved it", &no_context(), &cfg());
        let both = analyze("solved it", &ctx, &cfg());
        assert_eq!(text_only, both);
    }

    #[test]
    fn test_unknown_named_identifier_dropped() {
        let mut v = TriggerVector::new();
        v.add_named("serenity", 0.5);
        assert!(v.is_empty());

        v.add_named("joy", 0.5);
        assert!((v.get(Primary::Joy) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_group_weight_scales() {
        let mut cfg = cfg();
        cfg.user_feedback_weight = 0.0;
        let v = analyze("thanks", &no_context(), &cfg);
        assert_eq!(v.get(Primary::Joy), 0.0);
    }
}
