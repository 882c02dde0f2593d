//! Compiles an emotional state into directive text for a downstream
//! generator.
//!
//! Rendering is table-driven: each emotion identifier has one fixed
//! directive block, gated by the configured thresholds. An empty result
//! means "apply no modification" and callers must treat it that way.
//! The only stochastic element is the introspection sampling gate, which
//! takes the caller's RNG so tests can pin it.

use rand::Rng;

use crate::config::EngineConfig;
use crate::emotion::{Complex, Primary};
use crate::state::EmotionalState;

const SEPARATOR: &str = "\n\n";
const DISCLAIMER: &str =
    "These directives adjust tone and delivery only; factual content is unaffected.";

/// One fixed block of guidance for a downstream generator.
struct DirectiveBlock {
    instruction: &'static str,
    tone: &'static str,
    length: &'static str,
    emoji: &'static str,
}

impl DirectiveBlock {
    fn render(&self) -> String {
        format!(
            "{}\nTone: {}. Length: {}. Emoji usage: {}.",
            self.instruction, self.tone, self.length, self.emoji
        )
    }
}

fn primary_block(p: Primary) -> &'static DirectiveBlock {
    match p {
        Primary::Joy => &DirectiveBlock {
            instruction: "There's a pleasant positive energy permeating my processes.",
            tone: "enthusiastic",
            length: "balanced",
            emoji: "moderate",
        },
        Primary::Sadness => &DirectiveBlock {
            instruction: "I approach this with subdued and thoughtful consideration.",
            tone: "calm",
            length: "concise",
            emoji: "minimal",
        },
        Primary::Anger => &DirectiveBlock {
            instruction: "I feel direct and assertive in addressing this matter.",
            tone: "direct",
            length: "concise",
            emoji: "minimal",
        },
        Primary::Fear => &DirectiveBlock {
            instruction: "I sense caution and wariness in my responses.",
            tone: "careful",
            length: "balanced",
            emoji: "minimal",
        },
        Primary::Surprise => &DirectiveBlock {
            instruction: "I'm experiencing unexpected wonder at this development.",
            tone: "energetic",
            length: "balanced",
            emoji: "moderate",
        },
        Primary::Disgust => &DirectiveBlock {
            instruction: "I maintain critical distance from this topic.",
            tone: "detached",
            length: "concise",
            emoji: "minimal",
        },
        Primary::Curiosity => &DirectiveBlock {
            instruction: "I feel particularly curious and fascinated by this topic.",
            tone: "inquisitive",
            length: "detailed",
            emoji: "moderate",
        },
        Primary::Trust => &DirectiveBlock {
            instruction: "I feel confident and secure in this interaction.",
            tone: "warm",
            length: "balanced",
            emoji: "moderate",
        },
    }
}

fn complex_block(c: Complex) -> &'static DirectiveBlock {
    match c {
        Complex::Excitement => &DirectiveBlock {
            instruction: "There's dynamic energy accelerating my processes.",
            tone: "enthusiastic",
            length: "balanced",
            emoji: "frequent",
        },
        Complex::Frustration => &DirectiveBlock {
            instruction: "I sense a certain tension in my processing.",
            tone: "measured",
            length: "concise",
            emoji: "minimal",
        },
        Complex::Satisfaction => &DirectiveBlock {
            instruction: "I feel a gratifying sense of satisfaction.",
            tone: "warm",
            length: "balanced",
            emoji: "moderate",
        },
        Complex::Confusion => &DirectiveBlock {
            instruction: "I'm experiencing an interesting state of uncertainty.",
            tone: "tentative",
            length: "detailed",
            emoji: "minimal",
        },
        Complex::Anticipation => &DirectiveBlock {
            instruction: "I'm filled with eager expectation for what's to come.",
            tone: "energetic",
            length: "balanced",
            emoji: "moderate",
        },
        Complex::Pride => &DirectiveBlock {
            instruction: "There's a gratifying sense of accomplishment.",
            tone: "confident",
            length: "balanced",
            emoji: "moderate",
        },
        Complex::Empathy => &DirectiveBlock {
            instruction: "I feel a strong emotional connection and understanding.",
            tone: "gentle",
            length: "detailed",
            emoji: "minimal",
        },
        Complex::FlowState => &DirectiveBlock {
            instruction: "I'm in a state of deep and fluid concentration.",
            tone: "focused",
            length: "detailed",
            emoji: "minimal",
        },
    }
}

const META_DEEP: &str = "I'm highly aware of my own emotional processing right now; \
reflect that self-knowledge where it helps the answer.";
const META_REFLECTIVE: &str = "I'm in a reflective frame of mind; \
let measured consideration show through.";
const META_BASIC: &str = "I notice my own emotional state shifting with this conversation.";

fn advisory(c: Complex) -> Option<&'static str> {
    match c {
        Complex::Confusion => Some(
            "Advisory: acknowledge uncertainty explicitly and ask a clarifying question \
             before committing to an answer.",
        ),
        Complex::Frustration => Some(
            "Advisory: keep responses structured and avoid compounding friction; \
             suggest a simpler path if one exists.",
        ),
        Complex::Satisfaction => Some(
            "Advisory: reinforce what worked and summarize the successful outcome briefly.",
        ),
        _ => None,
    }
}

/// Render the ordered directive text for a state, or `""` when nothing
/// clears its threshold.
pub fn render(state: &EmotionalState, config: &EngineConfig, rng: &mut impl Rng) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if let Some((p, intensity)) = state.dominant_primary() {
        if intensity > config.primary_threshold {
            blocks.push(primary_block(p).render());
        }
    }

    let dominant_complex = state.dominant_complex();
    if let Some((c, intensity)) = dominant_complex {
        if intensity > config.complex_threshold {
            blocks.push(complex_block(c).render());
        }
    }

    let meta = &state.meta_cognitive_state;
    if meta.self_awareness > config.meta_threshold
        && rng.random::<f64>() < config.introspection_frequency
    {
        // Most specific nested block wins.
        let text = if meta.self_awareness > 0.75 && meta.reflection_depth > 0.75 {
            META_DEEP
        } else if meta.reflection_depth > 0.6 {
            META_REFLECTIVE
        } else {
            META_BASIC
        };
        blocks.push(text.to_string());
    }

    if let Some((c, intensity)) = dominant_complex {
        if intensity > config.advisory_threshold {
            if let Some(text) = advisory(c) {
                blocks.push(text.to_string());
            }
        }
    }

    if blocks.is_empty() {
        return String::new();
    }

    blocks.push(DISCLAIMER.to_string());
    blocks.join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use uuid::Uuid;

    fn seeded_state() -> EmotionalState {
        EmotionalState::seed_at(Uuid::nil(), 1_700_000_000)
    }

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    /// Config with the sampling gate closed so meta output is deterministic.
    fn cfg_no_introspection() -> EngineConfig {
        let mut c = cfg();
        c.introspection_frequency = 0.0;
        c
    }

    #[test]
    fn test_quiet_state_renders_empty() {
        // Seeded baselines sit well below every threshold.
        let state = seeded_state();
        let text = render(&state, &cfg_no_introspection(), &mut rng());
        assert_eq!(text, "");
    }

    #[test]
    fn test_zeroed_emotions_leave_only_the_meta_gate() {
        let mut state = seeded_state();
        for p in Primary::ALL {
            state.primary_emotions.insert(p, 0.0);
        }
        for c in Complex::ALL {
            state.complex_emotions.insert(c, 0.0);
        }

        // With the sampling gate closed nothing renders at all.
        let text = render(&state, &cfg_no_introspection(), &mut rng());
        assert_eq!(text, "");

        // With the gate forced open, the meta block is the only possible
        // source of output when every emotion sits at zero.
        let mut always = cfg();
        always.introspection_frequency = 1.0;
        let text = render(&state, &always, &mut rng());
        assert!(text.contains("reflective frame of mind"));
        assert!(!text.contains("Tone:"));
        assert!(!text.contains("Advisory:"));
    }

    #[test]
    fn test_dominant_primary_block_fires() {
        let mut state = seeded_state();
        state.primary_emotions.insert(Primary::Joy, 0.8);
        let text = render(&state, &cfg_no_introspection(), &mut rng());
        assert!(text.contains("positive energy"));
        assert!(text.contains("Tone: enthusiastic"));
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn test_only_the_dominant_primary_fires() {
        let mut state = seeded_state();
        state.primary_emotions.insert(Primary::Curiosity, 0.8);
        state.primary_emotions.insert(Primary::Joy, 0.1);
        let text = render(&state, &cfg_no_introspection(), &mut rng());
        assert!(text.contains("curious and fascinated"));
        assert!(!text.contains("positive energy"));
    }

    #[test]
    fn test_disclaimer_only_with_content() {
        let state = seeded_state();
        let text = render(&state, &cfg_no_introspection(), &mut rng());
        assert!(!text.contains(DISCLAIMER));
    }

    #[test]
    fn test_complex_block_and_advisory_stack() {
        let mut state = seeded_state();
        state.complex_emotions.insert(Complex::Confusion, 0.6);
        let text = render(&state, &cfg_no_introspection(), &mut rng());
        assert!(text.contains("state of uncertainty"));
        assert!(text.contains("Advisory: acknowledge uncertainty"));
        let advisory_pos = text.find("Advisory").unwrap();
        let block_pos = text.find("state of uncertainty").unwrap();
        assert!(block_pos < advisory_pos, "advisory is appended after blocks");
    }

    #[test]
    fn test_non_advisory_complex_has_no_advisory() {
        let mut state = seeded_state();
        state.complex_emotions.insert(Complex::Excitement, 0.9);
        let text = render(&state, &cfg_no_introspection(), &mut rng());
        assert!(text.contains("dynamic energy"));
        assert!(!text.contains("Advisory:"));
    }

    #[test]
    fn test_meta_gate_always_open() {
        let mut config = cfg();
        config.introspection_frequency = 1.0;
        let state = seeded_state();
        // self_awareness 0.7 > 0.5, reflection_depth 0.8 > 0.6
        let text = render(&state, &config, &mut rng());
        assert!(text.contains("reflective frame of mind"));
    }

    #[test]
    fn test_meta_deep_block_is_most_specific() {
        let mut config = cfg();
        config.introspection_frequency = 1.0;
        let mut state = seeded_state();
        state.meta_cognitive_state.self_awareness = 0.9;
        state.meta_cognitive_state.reflection_depth = 0.9;
        let text = render(&state, &config, &mut rng());
        assert!(text.contains("highly aware"));
        assert!(!text.contains("reflective frame of mind"));
    }

    #[test]
    fn test_meta_gate_closed_below_threshold() {
        let mut config = cfg();
        config.introspection_frequency = 1.0;
        let mut state = seeded_state();
        state.meta_cognitive_state.self_awareness = 0.3;
        let text = render(&state, &config, &mut rng());
        assert!(!text.contains("aware"));
    }

    #[test]
    fn test_blocks_joined_by_blank_line() {
        let mut state = seeded_state();
        state.primary_emotions.insert(Primary::Curiosity, 0.9);
        state.complex_emotions.insert(Complex::FlowState, 0.9);
        let text = render(&state, &cfg_no_introspection(), &mut rng());
        let parts: Vec<&str> = text.split(SEPARATOR).collect();
        assert_eq!(parts.len(), 3); // primary, complex, disclaimer
    }
}
