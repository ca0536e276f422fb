//! Post-construction analytics: trend lines, period deltas and rates.
//!
//! All functions are total: degenerate input yields zero rather than NaN or
//! infinity so dashboards never render garbage.

use serde::Serialize;

/// Hours in the OSHA TRIR normalisation base (100 full-time workers × 2000 h).
pub const TRIR_HOURS_BASE: f64 = 200_000.0;

/// Slope and intercept of an ordinary least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub slope: f64,
    pub intercept: f64,
}

impl Trend {
    pub const FLAT: Trend = Trend {
        slope: 0.0,
        intercept: 0.0,
    };
}

/// Fit `y = slope * x + intercept` where `x` is the sample index.
///
/// Fewer than two samples returns [`Trend::FLAT`].
///
/// ```
/// use verde_core::analytics::calculate_trend;
///
/// let t = calculate_trend(&[1.0, 2.0, 3.0, 4.0]);
/// assert_eq!((t.slope, t.intercept), (1.0, 1.0));
/// ```
pub fn calculate_trend(samples: &[f64]) -> Trend {
    let n = samples.len();
    if n < 2 {
        return Trend::FLAT;
    }

    let n_f = n as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in samples.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n_f * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return Trend::FLAT;
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n_f;
    Trend { slope, intercept }
}

/// Month-over-month percentage change. Returns 0 when `previous` is 0.
pub fn calculate_mom(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Emissions per labour hour. Returns 0 when `hours` is 0.
pub fn calculate_intensity(emissions: f64, hours: f64) -> f64 {
    if hours == 0.0 {
        return 0.0;
    }
    emissions / hours
}

/// Total Recordable Incident Rate. Returns 0 when `hours` is 0.
pub fn calculate_trir(incidents: f64, hours: f64) -> f64 {
    if hours == 0.0 {
        return 0.0;
    }
    incidents * TRIR_HOURS_BASE / hours
}

/// Signed distance from a target, as a percentage of the target.
///
/// Positive means over target. Returns `None` when the target is 0 or absent.
pub fn variance_from_target(actual: f64, target: Option<f64>) -> Option<f64> {
    match target {
        Some(t) if t != 0.0 => Some((actual - t) / t * 100.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn trend_of_empty_and_single_is_flat() {
        assert_eq!(calculate_trend(&[]), Trend::FLAT);
        assert_eq!(calculate_trend(&[42.0]), Trend::FLAT);
    }

    #[test]
    fn trend_of_linear_series() {
        let t = calculate_trend(&[1.0, 2.0, 3.0, 4.0]);
        assert!(approx(t.slope, 1.0));
        assert!(approx(t.intercept, 1.0));
    }

    #[test]
    fn trend_of_constant_series_has_zero_slope() {
        let t = calculate_trend(&[5.0, 5.0, 5.0]);
        assert!(approx(t.slope, 0.0));
        assert!(approx(t.intercept, 5.0));
    }

    #[test]
    fn trend_of_decreasing_series() {
        let t = calculate_trend(&[10.0, 8.0, 6.0]);
        assert!(approx(t.slope, -2.0));
        assert!(approx(t.intercept, 10.0));
    }

    #[test]
    fn mom_change() {
        assert!(approx(calculate_mom(110.0, 100.0), 10.0));
        assert!(approx(calculate_mom(50.0, 100.0), -50.0));
    }

    #[test]
    fn mom_guards_zero_previous() {
        assert_eq!(calculate_mom(123.0, 0.0), 0.0);
        assert_eq!(calculate_mom(0.0, 0.0), 0.0);
    }

    #[test]
    fn intensity() {
        assert_eq!(calculate_intensity(50.0, 0.0), 0.0);
        assert!(approx(calculate_intensity(100.0, 50.0), 2.0));
    }

    #[test]
    fn trir() {
        assert_eq!(calculate_trir(3.0, 0.0), 0.0);
        assert!(approx(calculate_trir(2.0, 100_000.0), 4.0));
    }

    #[test]
    fn variance() {
        assert_eq!(variance_from_target(10.0, None), None);
        assert_eq!(variance_from_target(10.0, Some(0.0)), None);
        assert!(approx(variance_from_target(120.0, Some(100.0)).unwrap(), 20.0));
    }
}
