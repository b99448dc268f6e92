//! Employment risk index over automation speed (A), wage factor (W) and
//! skill investment (S), with four selectable response curves.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::logistic;
use crate::normalize::{clamp_unit, min_max_dense};

/// Steepness of the logistic curve around A = 0.5.
pub const LOGISTIC_STEEPNESS: f64 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveMode {
    #[default]
    Linear,
    Quadratic,
    Exponential,
    Logistic,
}

impl CurveMode {
    pub const ALL: [CurveMode; 4] = [
        CurveMode::Linear,
        CurveMode::Quadratic,
        CurveMode::Exponential,
        CurveMode::Logistic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurveMode::Linear => "linear",
            CurveMode::Quadratic => "quadratic",
            CurveMode::Exponential => "exponential",
            CurveMode::Logistic => "logistic",
        }
    }
}

impl fmt::Display for CurveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        CurveMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                anyhow!(
                    "Invalid mode '{}': choose linear, quadratic, exponential, or logistic.",
                    s
                )
            })
    }
}

/// Risk category for an index value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low Employment Risk",
            RiskBand::Moderate => "Moderate Employment Risk",
            RiskBand::High => "High Employment Risk",
        }
    }
}

/// Cut-offs between bands: `< low_below` is Low, `>= high_from` is High.
///
/// Two sets are in use: the model's own
/// interpretation (0.2 / 0.6) and the display guide (0.33 / 0.67).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskBands {
    pub low_below: f64,
    pub high_from: f64,
}

impl RiskBands {
    pub const MODEL: RiskBands = RiskBands {
        low_below: 0.2,
        high_from: 0.6,
    };
    pub const DISPLAY: RiskBands = RiskBands {
        low_below: 0.33,
        high_from: 0.67,
    };

    pub fn classify(&self, value: f64) -> RiskBand {
        if value < self.low_below {
            RiskBand::Low
        } else if value < self.high_from {
            RiskBand::Moderate
        } else {
            RiskBand::High
        }
    }
}

impl Default for RiskBands {
    fn default() -> Self {
        Self::MODEL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskModel {
    pub weight_a: f64,
    pub weight_w: f64,
    pub weight_s: f64,
    pub mode: CurveMode,
    pub bands: RiskBands,
}

impl Default for RiskModel {
    fn default() -> Self {
        Self {
            weight_a: 1.0,
            weight_w: 1.0,
            weight_s: 1.0,
            mode: CurveMode::Linear,
            bands: RiskBands::MODEL,
        }
    }
}

/// One row of a scenario sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RiskScenario {
    pub automation_speed: f64,
    pub eri: f64,
    pub band: RiskBand,
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn curve(mode: CurveMode, a: f64, w: f64, s: f64) -> f64 {
    match mode {
        CurveMode::Linear => (a * w) / (s + 1.0),
        CurveMode::Quadratic => (w * a.powi(2)) / (s + 1.0),
        CurveMode::Exponential => (w * (a.exp() - 1.0)) / (s + 1.0),
        CurveMode::Logistic => {
            (w / (s + 1.0)) * logistic(LOGISTIC_STEEPNESS * (a - 0.5))
        }
    }
}

impl RiskModel {
    pub fn with_mode(mode: CurveMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Risk index for scalar inputs under `mode`, rounded to 4 decimals.
    /// Each input is weighted, then clipped into [0, 1].
    pub fn compute(&self, a: f64, w: f64, s: f64, mode: CurveMode) -> f64 {
        let a = clamp_unit(a * self.weight_a);
        let w = clamp_unit(w * self.weight_w);
        let s = clamp_unit(s * self.weight_s);
        round4(curve(mode, a, w, s))
    }

    /// [`compute`](Self::compute) with the mode given by name.
    pub fn compute_eri(&self, a: f64, w: f64, s: f64, mode: &str) -> Result<f64> {
        Ok(self.compute(a, w, s, mode.parse()?))
    }

    /// Element-wise risk index for equal-length series. Each series is
    /// min-max scaled over itself before the curve is applied.
    pub fn compute_series(&self, a: &[f64], w: &[f64], s: &[f64], mode: CurveMode) -> Result<Vec<f64>> {
        if a.len() != w.len() || a.len() != s.len() {
            bail!(
                "series lengths differ: A={}, W={}, S={}",
                a.len(),
                w.len(),
                s.len()
            );
        }
        let scale = |v: &[f64], weight: f64| {
            min_max_dense(v)
                .into_iter()
                .map(|x| clamp_unit(x * weight))
                .collect::<Vec<_>>()
        };
        let (a, w, s) = (scale(a, self.weight_a), scale(w, self.weight_w), scale(s, self.weight_s));
        Ok((0..a.len())
            .map(|i| round4(curve(mode, a[i], w[i], s[i])))
            .collect())
    }

    pub fn interpret(&self, value: f64) -> RiskBand {
        self.bands.classify(value)
    }

    /// Risk index and band at each automation speed, holding W and S fixed.
    pub fn simulate_scenarios(&self, a_values: &[f64], w: f64, s: f64, mode: CurveMode) -> Vec<RiskScenario> {
        a_values
            .iter()
            .map(|&a| {
                let eri = self.compute(a, w, s, mode);
                RiskScenario {
                    automation_speed: a,
                    eri,
                    band: self.interpret(eri),
                }
            })
            .collect()
    }
}
