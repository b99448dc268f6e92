/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Cell spellings treated as "no observation".
const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "nan", "null", "none", ".."];

pub fn is_missing(cell: &str) -> bool {
    let c = clean_str(cell);
    MISSING_MARKERS.iter().any(|m| c.eq_ignore_ascii_case(m))
}

/// Parse a numeric observation; anything non-finite or non-numeric is missing.
pub fn parse_value(cell: &str) -> Option<f64> {
    if is_missing(cell) {
        return None;
    }
    clean_str(cell).parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a year cell. Accepts integral floats ("2019.0"); rejects fractions.
pub fn parse_year(cell: &str) -> Option<i32> {
    if is_missing(cell) {
        return None;
    }
    let c = clean_str(cell);
    if let Ok(y) = c.parse::<i64>() {
        return i32::try_from(y).ok();
    }
    let f = c.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}
