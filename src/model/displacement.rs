//! Employment displacement: `D(t) = D0 * e^(beta * A * t)`.
//!
//! - `D0`: baseline jobs at risk
//! - `beta`: sensitivity of displacement to automation speed
//! - `A`: automation speed in [0, 1]
//! - `t`: time horizon in years

use serde::{Deserialize, Serialize};

use super::logistic;

/// Exponents above this are clamped before `exp` so results stay finite.
pub const MAX_EXPONENT: f64 = 100.0;
/// Horizon, in years, of the reference displacement used by [`DisplacementModel::index`].
pub const REFERENCE_YEARS: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplacementModel {
    pub beta: f64,
}

impl Default for DisplacementModel {
    fn default() -> Self {
        Self { beta: 0.3 }
    }
}

/// One point of a sweep over automation speed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DisplacementPoint {
    pub a: f64,
    pub raw: Option<f64>,
    pub percent: Option<f64>,
    pub index: Option<f64>,
}

impl DisplacementModel {
    pub fn new(beta: f64) -> Self {
        Self { beta }
    }

    /// Displaced jobs after `t` years. `None` unless `d0 > 0` and `t >= 0`.
    pub fn raw(&self, d0: f64, a: f64, t: f64) -> Option<f64> {
        if d0.is_nan() || a.is_nan() || t.is_nan() || d0 <= 0.0 || t < 0.0 {
            return None;
        }
        let exponent = (self.beta * a * t).min(MAX_EXPONENT);
        Some(d0 * exponent.exp())
    }

    /// Fractional increase `(D(t) - D0) / D0`.
    pub fn percent(&self, d0: f64, a: f64, t: f64) -> Option<f64> {
        if d0 == 0.0 {
            return None;
        }
        let d = self.raw(d0, a, t)?;
        Some((d - d0) / d0)
    }

    /// Percent displacement squashed to [0, 1].
    ///
    /// The percent is divided by the reference `e^(beta * 10) - 1` (the
    /// percent at A = 1 over ten years) and passed through a logistic, so
    /// the index is monotone in `a` and `t`. A = 0 or t = 0 gives 0.5.
    pub fn index(&self, d0: f64, a: f64, t: f64) -> Option<f64> {
        let pct = self.percent(d0, a, t)?;
        let reference = (self.beta * REFERENCE_YEARS).exp() - 1.0;
        let scaled = if reference > 0.0 { pct / reference } else { 0.0 };
        Some(logistic(scaled).clamp(0.0, 1.0))
    }

    /// Years until displacement grows by `target_pct` (0.5 = 50%).
    ///
    /// Solves `1 + target_pct = e^(beta * A * t)` for `t`. `None` when
    /// `a <= 0`, `beta <= 0` or the target is not reachable; negative
    /// solutions clamp to 0.
    pub fn time_to_threshold(&self, _d0: f64, a: f64, target_pct: f64) -> Option<f64> {
        if a.is_nan() || a <= 0.0 || self.beta <= 0.0 {
            return None;
        }
        let t = (1.0 + target_pct).ln() / (self.beta * a);
        t.is_finite().then(|| t.max(0.0))
    }

    /// Evaluate raw/percent/index at each automation speed in `a_values`.
    pub fn sweep(&self, d0: f64, t: f64, a_values: &[f64]) -> Vec<DisplacementPoint> {
        a_values
            .iter()
            .map(|&a| DisplacementPoint {
                a,
                raw: self.raw(d0, a, t),
                percent: self.percent(d0, a, t),
                index: self.index(d0, a, t),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::linspace;

    #[test]
    fn test_raw_and_percent() {
        let m = DisplacementModel::default();
        let raw = m.raw(100_000.0, 0.4, 10.0).unwrap();
        assert!((raw - 100_000.0 * 1.2f64.exp()).abs() < 1e-6);
        let pct = m.percent(100_000.0, 0.4, 10.0).unwrap();
        assert!((pct - (1.2f64.exp() - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_inputs() {
        let m = DisplacementModel::default();
        assert_eq!(m.raw(0.0, 0.5, 1.0), None);
        assert_eq!(m.raw(-5.0, 0.5, 1.0), None);
        assert_eq!(m.raw(10.0, 0.5, -1.0), None);
        assert_eq!(m.raw(10.0, f64::NAN, 1.0), None);
        assert_eq!(m.percent(0.0, 0.5, 1.0), None);
        assert_eq!(m.index(0.0, 0.5, 1.0), None);
    }

    #[test]
    fn test_round_trip_time_to_threshold() {
        let m = DisplacementModel::new(0.3);
        let pct = m.percent(100_000.0, 0.4, 10.0).unwrap();
        let t = m.time_to_threshold(100_000.0, 0.4, pct).unwrap();
        assert!((t - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_to_threshold_guards() {
        let m = DisplacementModel::default();
        assert_eq!(m.time_to_threshold(1.0, 0.0, 0.5), None);
        assert_eq!(DisplacementModel::new(0.0).time_to_threshold(1.0, 0.5, 0.5), None);
        assert_eq!(m.time_to_threshold(1.0, 0.5, -0.5), Some(0.0));
        assert_eq!(m.time_to_threshold(1.0, 0.5, -1.0), None);
    }

    #[test]
    fn test_overflow_guard() {
        let m = DisplacementModel::new(1.0);
        let raw = m.raw(1000.0, 1.0, 1000.0).unwrap();
        assert!(raw.is_finite());
        assert_eq!(raw, 1000.0 * 100f64.exp());
        assert!(m.index(1000.0, 1.0, 1000.0).unwrap() <= 1.0);
    }

    #[test]
    fn test_index_monotone_in_a_and_t() {
        let m = DisplacementModel::default();
        assert_eq!(m.index(500.0, 0.0, 10.0), Some(0.5));
        let sweep = m.sweep(500.0, 10.0, &linspace(0.0, 1.0, 11));
        let idx: Vec<f64> = sweep.iter().map(|p| p.index.unwrap()).collect();
        assert!(idx.windows(2).all(|w| w[0] <= w[1]));
        let by_t: Vec<f64> = (0..=20)
            .map(|t| m.index(500.0, 0.7, t as f64).unwrap())
            .collect();
        assert!(by_t.windows(2).all(|w| w[0] <= w[1]));
    }
}
