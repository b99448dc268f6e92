// src/model/mod.rs
pub mod displacement;
pub mod productivity;
pub mod risk;

pub use displacement::DisplacementModel;
pub use productivity::ProductivityModel;
pub use risk::{CurveMode, RiskBand, RiskBands, RiskModel};

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Logistic squashing `1 / (1 + e^(-x))`.
pub(crate) fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
