/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;

/// Mean-reversion rate for meta-cognitive parameters and personality drift
pub const REVERSION_RATE: f64 = 0.05;

/// Gain applied to summed primary-emotion change when tracking volatility
pub const VOLATILITY_GAIN: f64 = 0.1;

/// Floor for personality-derived primary-emotion seed baselines
pub const BASELINE_MIN: f64 = 0.05;

/// Ceiling for personality-derived primary-emotion seed baselines
pub const BASELINE_MAX: f64 = 0.20;

/// Seed value for complex emotions in a fresh state
pub const COMPLEX_SEED: f64 = 0.05;

/// Clamp a value into [0, 1].
pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}
