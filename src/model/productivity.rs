//! Productivity gain: `P = P0 * (1 + alpha * A)`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductivityModel {
    /// Elasticity of productivity with respect to automation.
    pub alpha: f64,
}

impl Default for ProductivityModel {
    fn default() -> Self {
        Self { alpha: 0.4 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProductivityPoint {
    pub a: f64,
    pub raw: Option<f64>,
    pub percent: Option<f64>,
    pub index: Option<f64>,
}

impl ProductivityModel {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn raw(&self, p0: f64, a: f64) -> Option<f64> {
        if p0.is_nan() || a.is_nan() {
            return None;
        }
        Some(p0 * (1.0 + self.alpha * a))
    }

    /// `(P - P0) / P0`, which reduces to `alpha * A`; undefined for a zero
    /// baseline.
    pub fn percent(&self, p0: f64, a: f64) -> Option<f64> {
        if p0 == 0.0 || p0.is_nan() || a.is_nan() {
            return None;
        }
        Some(self.alpha * a)
    }

    /// Percent gain over its maximum (`alpha`, reached at A = 1), clipped to [0, 1].
    pub fn index(&self, p0: f64, a: f64) -> Option<f64> {
        if self.alpha == 0.0 {
            return None;
        }
        let pct = self.percent(p0, a)?;
        Some((pct / self.alpha).clamp(0.0, 1.0))
    }

    pub fn sweep(&self, p0: f64, a_values: &[f64]) -> Vec<ProductivityPoint> {
        a_values
            .iter()
            .map(|&a| ProductivityPoint {
                a,
                raw: self.raw(p0, a),
                percent: self.percent(p0, a),
                index: self.index(p0, a),
            })
            .collect()
    }
}
