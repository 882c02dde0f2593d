//! Terminal rendering of states and forecasts: intensity bars, sorted
//! emotion lists, dominants.

use affect_core::{EmotionalState, Forecast};

const BAR_WIDTH: usize = 10;

/// `█`/`░` bar for a [0, 1] intensity.
fn bar(value: f64) -> String {
    let filled = (value.clamp(0.0, 1.0) * BAR_WIDTH as f64) as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Emotions sorted by intensity, hiding anything at or below 0.1.
fn emotion_section<'a, I>(title: &str, emotions: I) -> String
where
    I: Iterator<Item = (&'a str, f64)>,
{
    let mut rows: Vec<(&str, f64)> = emotions.collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut out = vec![format!("{title}:")];
    for (name, intensity) in rows {
        if intensity > 0.1 {
            out.push(format!(
                "  {}: {} {:.1}%",
                title_case(name),
                bar(intensity),
                intensity * 100.0
            ));
        }
    }
    if out.len() == 1 {
        out.push("  (all quiet)".to_string());
    }
    out.join("\n")
}

pub fn format_state(state: &EmotionalState, detailed: bool) -> String {
    let mut out = vec![
        "Current Emotional State".to_string(),
        "=".repeat(30),
        emotion_section(
            "Primary Emotions",
            state
                .primary_emotions
                .iter()
                .map(|(p, v)| (p.as_str(), *v)),
        ),
        String::new(),
        emotion_section(
            "Complex Emotions",
            state
                .complex_emotions
                .iter()
                .map(|(c, v)| (c.as_str(), *v)),
        ),
    ];

    out.push(String::new());
    out.push("Dominant Emotions:".to_string());
    if let Some((p, v)) = state.dominant_primary() {
        out.push(format!("  Primary: {} ({v:.2})", title_case(p.as_str())));
    }
    if let Some((c, v)) = state.dominant_complex() {
        out.push(format!("  Complex: {} ({v:.2})", title_case(c.as_str())));
    }

    if detailed {
        let meta = &state.meta_cognitive_state;
        out.push(String::new());
        out.push("Meta-Cognitive State:".to_string());
        for (name, value) in [
            ("self_awareness", meta.self_awareness),
            ("emotional_volatility", meta.emotional_volatility),
            ("learning_rate", meta.learning_rate),
            ("reflection_depth", meta.reflection_depth),
            ("introspective_tendency", meta.introspective_tendency),
            ("philosophical_inclination", meta.philosophical_inclination),
        ] {
            out.push(format!(
                "  {}: {} {:.1}%",
                title_case(name),
                bar(value),
                value * 100.0
            ));
        }

        out.push(String::new());
        out.push("Personality Traits:".to_string());
        for (t, value) in &state.personality_traits {
            out.push(format!(
                "  {}: {} {:.1}%",
                title_case(t.as_str()),
                bar(*value),
                value * 100.0
            ));
        }

        out.push(String::new());
        out.push("Learning:".to_string());
        out.push(format!("  Episodes: {}", state.ml_state.learning_episodes));
        out.push(format!("  Confidence: {:.2}", state.ml_state.confidence));
        out.push(format!(
            "  Prediction accuracy: {:.2}",
            state.ml_state.prediction_accuracy
        ));
    }

    out.push(String::new());
    out.push(format!("Confidence: {:.2}", state.confidence_score));
    out.push(format!("Session: {}", state.session_id));
    out.join("\n")
}

pub fn format_forecast(forecast: &Forecast) -> String {
    [
        format!("Forecast (+{} minutes)", forecast.horizon_minutes),
        "=".repeat(30),
        emotion_section(
            "Predicted Emotions",
            forecast
                .predicted_emotions
                .iter()
                .map(|(p, v)| (p.as_str(), *v)),
        ),
        format!("Confidence: {:.2}", forecast.confidence),
        "Heuristic extrapolation only - not a trained forecast.".to_string(),
    ]
    .join("\n")
}
