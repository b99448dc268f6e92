use serde::Serialize;
use tracing::{debug, instrument};

use super::find_column;
use crate::diagnostics::Diagnostics;
use crate::ingest::kinds::column_kinds;
use crate::ingest::utils::{clean_str, parse_value};
use crate::ingest::RawTable;
use crate::model::{RiskBand, RiskBands};
use crate::normalize::{clamp_unit, NEUTRAL};

const CODE_COLUMNS: &[&str] = &["O*NET-SOC Code", "O*NET-SOC", "Code", "SOC Code"];
const TITLE_COLUMNS: &[&str] = &["Title", "Occupation", "Job Title"];

const ROUTINE_MANUAL_WEIGHT: f64 = 0.4;
const COGNITIVE_WEIGHT: f64 = 0.3;
const HUMAN_WEIGHT: f64 = 0.3;

/// Automation risk of one occupation and the components it was built from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OccupationRisk {
    pub code: String,
    pub title: String,
    pub routine_intensity: f64,
    pub manual_intensity: f64,
    pub cognitive_complexity: f64,
    pub human_interaction: f64,
    pub score: f64,
    pub band: RiskBand,
}

/// Occupation counts per risk band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RiskDistribution {
    pub fn from_scores(risks: &[OccupationRisk]) -> Self {
        risks.iter().fold(Self::default(), |mut acc, r| {
            match r.band {
                RiskBand::Low => acc.low += 1,
                RiskBand::Moderate => acc.medium += 1,
                RiskBand::High => acc.high += 1,
            }
            acc
        })
    }
}

/// Map a component to [0, 1]: values above 100 are read as hundredths of a
/// percent scale, everything is clipped, missing is neutral.
pub fn normalize_component(value: Option<f64>) -> f64 {
    match value {
        None => NEUTRAL,
        Some(v) if v.is_nan() => NEUTRAL,
        Some(v) if v > 100.0 => clamp_unit(v / 100.0),
        Some(v) => clamp_unit(v),
    }
}

/// `(routine + manual) * 0.4 + (1 - cognitive) * 0.3 + (1 - human) * 0.3`,
/// clipped to [0, 1].
pub fn automation_risk(routine: f64, manual: f64, cognitive: f64, human: f64) -> f64 {
    clamp_unit(
        (routine + manual) * ROUTINE_MANUAL_WEIGHT
            + (1.0 - cognitive) * COGNITIVE_WEIGHT
            + (1.0 - human) * HUMAN_WEIGHT,
    )
}

/// Split a row's numeric values into (routine, manual, cognitive, human).
///
/// Four or more values map positionally. Fewer spread the first value over
/// routine and manual and the last over cognitive and human.
fn components(values: &[Option<f64>]) -> [f64; 4] {
    match values {
        [] => [NEUTRAL; 4],
        [only] => {
            let v = normalize_component(*only);
            [v, v, NEUTRAL, NEUTRAL]
        }
        [r, m, c, h, ..] => [
            normalize_component(*r),
            normalize_component(*m),
            normalize_component(*c),
            normalize_component(*h),
        ],
        [first, .., last] => {
            let (f, l) = (normalize_component(*first), normalize_component(*last));
            [f, f, l, l]
        }
    }
}

/// Score every row of an occupations table.
///
/// Numeric columns (other than the code and title columns) supply the
/// components in header order. With no numeric column at all, cells after
/// the first two columns are parsed with thousands separators removed and
/// unparsable cells skipped.
#[instrument(level = "info", skip(table, diags), fields(rows = table.rows.len()))]
pub fn score_occupations(table: &RawTable, diags: &mut Diagnostics) -> Vec<OccupationRisk> {
    if table.is_empty() {
        diags.error("Occupations data not loaded");
        return Vec::new();
    }
    diags.info("Computing automation risk scores from O*NET data...");

    let code_col = find_column(&table.headers, CODE_COLUMNS).unwrap_or(0);
    let title_col = find_column(&table.headers, TITLE_COLUMNS)
        .unwrap_or(if table.num_columns() > 1 { 1 } else { 0 });
    diags.info(format!(
        "Using code column '{}' and title column '{}'",
        table.headers[code_col], table.headers[title_col]
    ));

    let numeric: Vec<usize> = column_kinds(table)
        .iter()
        .enumerate()
        .filter(|(i, k)| k.is_numeric() && *i != code_col && *i != title_col)
        .map(|(i, _)| i)
        .collect();
    if numeric.is_empty() {
        diags.warn("No numeric columns found; parsing numeric strings after the first two columns");
    }
    debug!(?numeric, code_col, title_col, "occupation columns");

    let bands = RiskBands::DISPLAY;
    let risks: Vec<OccupationRisk> = table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let values: Vec<Option<f64>> = if numeric.is_empty() {
                row.iter()
                    .skip(2)
                    .filter_map(|cell| parse_value(&cell.replace(',', "")))
                    .map(Some)
                    .collect()
            } else {
                numeric.iter().map(|&c| parse_value(&row[c])).collect()
            };
            let [routine, manual, cognitive, human] = components(&values);
            let score = automation_risk(routine, manual, cognitive, human);

            let code = clean_str(&row[code_col]);
            let title = clean_str(&row[title_col]);
            OccupationRisk {
                code: if code.is_empty() { format!("OCC_{}", idx) } else { code },
                title: if title.is_empty() { format!("Occupation {}", idx) } else { title },
                routine_intensity: routine,
                manual_intensity: manual,
                cognitive_complexity: cognitive,
                human_interaction: human,
                score,
                band: bands.classify(score),
            }
        })
        .collect();

    diags.success(format!("Computed automation risk for {} occupations", risks.len()));
    risks
}
