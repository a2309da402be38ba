use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// How the delay between two attempts of the same task grows.
///
/// - `Linear`: `base * attempt` (1x, 2x, 3x, ...). This is the default.
/// - `Exponential`: `base * 2^attempt` (2x, 4x, 8x, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffPolicy {
    #[default]
    Linear,
    Exponential,
}

impl BackoffPolicy {
    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay(self, base: Duration, attempt: u32) -> Duration {
        match self {
            BackoffPolicy::Linear => base.saturating_mul(attempt),
            BackoffPolicy::Exponential => {
                let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
                base.saturating_mul(factor)
            }
        }
    }
}

impl FromStr for BackoffPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(BackoffPolicy::Linear),
            "exponential" => Ok(BackoffPolicy::Exponential),
            other => Err(format!(
                "invalid backoff: {other} (expected \"linear\" or \"exponential\")"
            )),
        }
    }
}
