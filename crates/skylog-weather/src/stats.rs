//! Descriptive statistics and trend detection over temperature history.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::UnitSystem;

/// Slope magnitude below which a temperature series counts as flat.
const STABLE_SLOPE_THRESHOLD: f64 = 0.1;

/// Qualitative direction of a temperature series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Stable => "stable",
        };
        write!(f, "{label}")
    }
}

/// Summary statistics over a temperature history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherStats {
    /// Mean temperature, rounded to one decimal place
    pub average: f64,
    pub minimum: i64,
    pub maximum: i64,
    pub trend: Trend,
}

/// Detect the trend of an ordered temperature sequence.
///
/// Fits an ordinary least-squares line of temperature against positional
/// index. Fewer than two points, a degenerate fit, or a slope within
/// ±0.1 all read as stable.
pub fn trend(temps: &[f64]) -> Trend {
    let n = temps.len();
    if n < 2 {
        return Trend::Stable;
    }

    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = temps.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in temps.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (y - mean_y);
        denominator += dx * dx;
    }

    if denominator == 0.0 {
        return Trend::Stable;
    }

    let slope = numerator / denominator;
    if slope.abs() < STABLE_SLOPE_THRESHOLD {
        Trend::Stable
    } else if slope > 0.0 {
        Trend::Rising
    } else {
        Trend::Falling
    }
}

/// Compute summary statistics over an ordered temperature history.
///
/// Returns `None` when there are no temperatures to summarize; callers
/// render that as their "no data" sentinel instead of zeros.
pub fn statistics(temps: &[i64]) -> Option<WeatherStats> {
    if temps.is_empty() {
        return None;
    }

    let as_f64: Vec<f64> = temps.iter().map(|&t| t as f64).collect();
    let mean = as_f64.iter().sum::<f64>() / as_f64.len() as f64;

    // min/max over a non-empty slice of integers
    let minimum = temps.iter().copied().min()?;
    let maximum = temps.iter().copied().max()?;

    Some(WeatherStats {
        average: (mean * 10.0).round() / 10.0,
        minimum,
        maximum,
        trend: trend(&as_f64),
    })
}

/// Convert a temperature between unit systems.
pub fn convert_temperature(temp: f64, from: UnitSystem, to: UnitSystem) -> f64 {
    if from == to {
        return temp;
    }
    match to {
        UnitSystem::Metric => (temp - 32.0) * 5.0 / 9.0,
        UnitSystem::Imperial => temp * 9.0 / 5.0 + 32.0,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_trend_rising() {
        assert_eq!(trend(&[10.0, 12.0, 14.0, 16.0]), Trend::Rising);
    }

    #[test]
    fn test_trend_falling() {
        assert_eq!(trend(&[16.0, 14.0, 12.0, 10.0]), Trend::Falling);
    }

    #[test]
    fn test_trend_flat_series_is_stable() {
        assert_eq!(trend(&[20.0, 20.0, 20.0, 20.0]), Trend::Stable);
    }

    #[test]
    fn test_trend_single_point_is_stable() {
        assert_eq!(trend(&[42.0]), Trend::Stable);
    }

    #[test]
    fn test_trend_empty_is_stable() {
        assert_eq!(trend(&[]), Trend::Stable);
    }

    #[test]
    fn test_trend_small_slope_is_stable() {
        // Slope of 0.05 per step, under the 0.1 threshold
        assert_eq!(trend(&[20.0, 20.05, 20.1, 20.15]), Trend::Stable);
    }

    #[test]
    fn test_trend_noisy_but_rising() {
        assert_eq!(trend(&[10.0, 14.0, 11.0, 17.0, 15.0, 19.0]), Trend::Rising);
    }

    #[test]
    fn test_statistics_basic() {
        let stats = statistics(&[60, 70, 65]).unwrap();
        assert_eq!(stats.average, 65.0);
        assert_eq!(stats.minimum, 60);
        assert_eq!(stats.maximum, 70);
    }

    #[test]
    fn test_statistics_average_rounded_one_decimal() {
        let stats = statistics(&[60, 61]).unwrap();
        assert_eq!(stats.average, 60.5);

        let stats = statistics(&[10, 10, 11]).unwrap();
        assert_eq!(stats.average, 10.3);
    }

    #[test]
    fn test_statistics_carries_trend() {
        let stats = statistics(&[10, 12, 14, 16]).unwrap();
        assert_eq!(stats.trend, Trend::Rising);
    }

    #[test]
    fn test_statistics_empty_is_none() {
        assert!(statistics(&[]).is_none());
    }

    #[test]
    fn test_trend_display_labels() {
        assert_eq!(Trend::Rising.to_string(), "rising");
        assert_eq!(Trend::Falling.to_string(), "falling");
        assert_eq!(Trend::Stable.to_string(), "stable");
    }

    #[test]
    fn test_convert_temperature_identity() {
        let c = convert_temperature(25.0, UnitSystem::Metric, UnitSystem::Metric);
        assert_eq!(c, 25.0);
    }

    #[test]
    fn test_convert_temperature_between_scales() {
        let c = convert_temperature(32.0, UnitSystem::Imperial, UnitSystem::Metric);
        assert!((c - 0.0).abs() < 1e-9);

        let f = convert_temperature(100.0, UnitSystem::Metric, UnitSystem::Imperial);
        assert!((f - 212.0).abs() < 1e-9);
    }
}
