// src/index.rs

use tracing::debug;

use crate::normalize::NEUTRAL;

pub const LOWER_PERCENTILE: f64 = 0.01;
pub const UPPER_PERCENTILE: f64 = 0.99;

/// Composite automation-speed feature
/// `A = (unemployment_norm + (1 - employment_ratio_norm)) / 2`, with either
/// input defaulting to the neutral value when missing.
pub fn automation_speed(unemp_norm: Option<f64>, emp_pop_norm: Option<f64>) -> f64 {
    (unemp_norm.unwrap_or(NEUTRAL) + (1.0 - emp_pop_norm.unwrap_or(NEUTRAL))) / 2.0
}

/// Column-wise [`automation_speed`].
pub fn automation_speed_column(unemp_norm: &[Option<f64>], emp_pop_norm: &[Option<f64>]) -> Vec<f64> {
    unemp_norm
        .iter()
        .zip(emp_pop_norm)
        .map(|(&u, &e)| automation_speed(u, e))
        .collect()
}

/// `(new - base) / base`; missing when either side is missing, the base
/// is zero, or the result is not finite.
pub fn percent_change(base: Option<f64>, new: Option<f64>) -> Option<f64> {
    let (b, n) = (base?, new?);
    if b == 0.0 {
        return None;
    }
    Some((n - b) / b).filter(|v| v.is_finite())
}

/// Quantile `q` of ascending `sorted` data by linear interpolation between
/// closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Robust [0, 1] index of a percent column.
///
/// Values are clipped to their 1st/99th percentiles, missing entries take
/// the 1st percentile, and the result is rescaled by `(v - p1) / (p99 - p1)`
/// (denominator 1 when the percentiles coincide). With no present values at
/// all every row is 0. Output is always clipped to [0, 1].
pub fn percentile_index(percent: &[Option<f64>]) -> Vec<f64> {
    let mut present: Vec<f64> = percent.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    if present.is_empty() {
        return vec![0.0; percent.len()];
    }
    present.sort_by(|a, b| a.total_cmp(b));

    let p1 = quantile(&present, LOWER_PERCENTILE).unwrap_or(0.0);
    let p99 = quantile(&present, UPPER_PERCENTILE).unwrap_or(0.0);
    let denom = if p99 - p1 != 0.0 { p99 - p1 } else { 1.0 };
    debug!(p1, p99, n = present.len(), "percentile scaling");

    percent
        .iter()
        .map(|v| {
            let v = v.filter(|x| x.is_finite()).map_or(p1, |x| x.clamp(p1, p99));
            let idx = (v - p1) / denom;
            if idx.is_nan() {
                0.0
            } else {
                idx.clamp(0.0, 1.0)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_automation_speed_defaults() {
        assert_eq!(automation_speed(None, None), 0.5);
        assert_eq!(automation_speed(Some(1.0), Some(0.0)), 1.0);
        assert_eq!(automation_speed(Some(0.0), Some(1.0)), 0.0);
        assert_eq!(
            automation_speed_column(&[Some(1.0), None], &[None, Some(0.0)]),
            vec![0.75, 0.75]
        );
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(Some(100.0), Some(150.0)), Some(0.5));
        assert_eq!(percent_change(Some(0.0), Some(1.0)), None);
        assert_eq!(percent_change(None, Some(1.0)), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&data, 0.0), Some(1.0));
        assert_eq!(quantile(&data, 0.5), Some(3.0));
        assert_eq!(quantile(&data, 0.25), Some(2.0));
        assert!((quantile(&data, 0.99).unwrap() - 4.96).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_outlier_is_clipped_and_order_kept() {
        let pct = [Some(-0.5), Some(0.0), Some(0.5), Some(1.0), Some(100.0)];
        let idx = percentile_index(&pct);
        assert!(idx.windows(2).all(|w| w[0] <= w[1]));
        assert!(idx.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(idx[0], 0.0);
        assert_eq!(idx[4], 1.0);
        assert!(idx[3] < 0.05);
    }

    #[test]
    fn test_missing_and_degenerate() {
        assert_eq!(percentile_index(&[None, None]), vec![0.0, 0.0]);
        assert_eq!(percentile_index(&[Some(0.3), None, Some(0.3)]), vec![0.0, 0.0, 0.0]);
        let idx = percentile_index(&[Some(1.0), None, Some(3.0)]);
        assert_eq!(idx[1], 0.0);
    }
}
