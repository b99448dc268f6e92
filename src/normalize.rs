// src/normalize.rs

/// Value used wherever an indicator is unavailable or carries no spread.
pub const NEUTRAL: f64 = 0.5;

/// Min-max scale a series to [0, 1].
///
/// Missing entries stay missing. If fewer than two entries are present, or
/// all present entries are equal, every row (missing ones included) gets
/// [`NEUTRAL`] instead.
pub fn min_max(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();

    let (min, max) = present
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if present.len() < 2 || max == min {
        return vec![Some(NEUTRAL); values.len()];
    }

    let range = max - min;
    values
        .iter()
        .map(|v| v.filter(|x| x.is_finite()).map(|x| (x - min) / range))
        .collect()
}

/// Min-max scale a dense slice; degenerate input maps to [`NEUTRAL`].
pub fn min_max_dense(values: &[f64]) -> Vec<f64> {
    let wrapped: Vec<Option<f64>> = values.iter().map(|&v| Some(v)).collect();
    min_max(&wrapped)
        .into_iter()
        .map(|v| v.unwrap_or(NEUTRAL))
        .collect()
}

/// Clip a scalar into [0, 1]. NaN maps to 0.
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
