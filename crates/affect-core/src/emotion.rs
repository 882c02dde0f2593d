//! Closed emotion and personality enumerations.
//!
//! Declaration order matters: dominance ties are broken by the order the
//! variants are declared, so the derived `Ord` doubles as the tie-break.

use serde::{Deserialize, Serialize};

/// Base affect dimensions. Values live in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primary {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Curiosity,
    Trust,
}

impl Primary {
    pub const ALL: [Primary; 8] = [
        Primary::Joy,
        Primary::Sadness,
        Primary::Anger,
        Primary::Fear,
        Primary::Surprise,
        Primary::Disgust,
        Primary::Curiosity,
        Primary::Trust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Primary::Joy => "joy",
            Primary::Sadness => "sadness",
            Primary::Anger => "anger",
            Primary::Fear => "fear",
            Primary::Surprise => "surprise",
            Primary::Disgust => "disgust",
            Primary::Curiosity => "curiosity",
            Primary::Trust => "trust",
        }
    }

    /// Parse an identifier. Unknown names return `None` — callers at the
    /// trigger boundary drop them instead of letting them reach the engine.
    pub fn parse(name: &str) -> Option<Primary> {
        Primary::ALL.iter().copied().find(|p| p.as_str() == name)
    }
}

/// Derived affects, each a static weighted combination of primaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complex {
    Excitement,
    Frustration,
    Satisfaction,
    Confusion,
    Anticipation,
    Pride,
    Empathy,
    FlowState,
}

impl Complex {
    pub const ALL: [Complex; 8] = [
        Complex::Excitement,
        Complex::Frustration,
        Complex::Satisfaction,
        Complex::Confusion,
        Complex::Anticipation,
        Complex::Pride,
        Complex::Empathy,
        Complex::FlowState,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Complex::Excitement => "excitement",
            Complex::Frustration => "frustration",
            Complex::Satisfaction => "satisfaction",
            Complex::Confusion => "confusion",
            Complex::Anticipation => "anticipation",
            Complex::Pride => "pride",
            Complex::Empathy => "empathy",
            Complex::FlowState => "flow_state",
        }
    }

    /// Hand-tuned intensity multiplier for this derived emotion.
    /// Treated as tunable constants, not proven coefficients.
    pub fn weight(&self) -> f64 {
        match self {
            Complex::Excitement => 1.1,
            Complex::Frustration => 0.8,
            Complex::Satisfaction => 1.0,
            Complex::Confusion => 0.6,
            Complex::Anticipation => 0.9,
            Complex::Pride => 1.0,
            Complex::Empathy => 0.9,
            Complex::FlowState => 1.3,
        }
    }

    /// Static composition table: (primary component, component weight).
    /// Component weights sum to 1.0 per complex emotion.
    pub fn components(&self) -> &'static [(Primary, f64)] {
        match self {
            Complex::Excitement => &[(Primary::Joy, 0.5), (Primary::Surprise, 0.5)],
            Complex::Frustration => &[(Primary::Anger, 0.5), (Primary::Sadness, 0.5)],
            Complex::Satisfaction => &[(Primary::Joy, 0.5), (Primary::Trust, 0.5)],
            Complex::Confusion => &[(Primary::Surprise, 0.5), (Primary::Fear, 0.5)],
            Complex::Anticipation => &[(Primary::Curiosity, 0.5), (Primary::Joy, 0.5)],
            Complex::Pride => &[
                (Primary::Joy, 0.5),
                (Primary::Trust, 0.25),
                (Primary::Surprise, 0.25),
            ],
            Complex::Empathy => &[(Primary::Trust, 0.5), (Primary::Sadness, 0.5)],
            Complex::FlowState => &[
                (Primary::Curiosity, 0.5),
                (Primary::Joy, 0.25),
                (Primary::Trust, 0.25),
            ],
        }
    }
}

/// Personality dimensions (Big Five plus two engine-specific drives).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    Extraversion,
    Openness,
    Conscientiousness,
    Agreeableness,
    Neuroticism,
    CuriosityDrive,
    Perfectionism,
}

impl Trait {
    pub const ALL: [Trait; 7] = [
        Trait::Extraversion,
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Agreeableness,
        Trait::Neuroticism,
        Trait::CuriosityDrive,
        Trait::Perfectionism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trait::Extraversion => "extraversion",
            Trait::Openness => "openness",
            Trait::Conscientiousness => "conscientiousness",
            Trait::Agreeableness => "agreeableness",
            Trait::Neuroticism => "neuroticism",
            Trait::CuriosityDrive => "curiosity_drive",
            Trait::Perfectionism => "perfectionism",
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            Trait::Extraversion => 0.6,
            Trait::Openness => 0.8,
            Trait::Conscientiousness => 0.7,
            Trait::Agreeableness => 0.5,
            Trait::Neuroticism => 0.3,
            Trait::CuriosityDrive => 0.9,
            Trait::Perfectionism => 0.4,
        }
    }
}
