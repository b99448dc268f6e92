use std::path::Path;
use tracing::instrument;

use super::{
    load_sources, no_data, norm_column, normalize_indicators, IndexReport, AUTOMATION_SPEED,
};
use crate::config::PipelineConfig;
use crate::diagnostics::Diagnostics;
use crate::index::{automation_speed_column, percent_change, percentile_index};
use crate::merge::outer_join;
use crate::population::{employment_from_ratio, population_for};
use crate::resolve::catalog::DISPLACEMENT_INDICATORS;

pub const EMPLOYMENT: &str = "Employment";
pub const POPULATION: &str = "Population";
pub const TIME_YEARS: &str = "TimeYears";
pub const EDM_RAW: &str = "EDM_raw";
pub const EDM_PCT: &str = "EDM_pct";
pub const EDM_INDEX: &str = "EDM_index";
pub const YEARS_TO_THRESHOLD: &str = "YearsToThreshold";

/// Output columns after Area and Year, in order.
pub const OUTPUT_COLUMNS: &[&str] = &[
    AUTOMATION_SPEED,
    EMPLOYMENT,
    POPULATION,
    "EmpPop",
    "Unemp",
    TIME_YEARS,
    EDM_RAW,
    EDM_PCT,
    EDM_INDEX,
    YEARS_TO_THRESHOLD,
];

/// Load labour-market indicators from `dir` and compute the employment
/// displacement index per (Area, Year).
///
/// Employment is back-derived from the employment-to-population ratio and
/// the population proxy; the time horizon is years since each area's first
/// observation.
#[instrument(level = "info", skip(dir, config), fields(dir = %dir.as_ref().display()))]
pub fn load_displacement_dataset<P: AsRef<Path>>(dir: P, config: &PipelineConfig) -> IndexReport {
    let mut diags = Diagnostics::new();
    let tables = load_sources(dir.as_ref(), DISPLACEMENT_INDICATORS, config.ingest, &mut diags);
    if tables.is_empty() {
        return no_data(diags);
    }

    let mut data = outer_join(&tables, None);
    normalize_indicators(&mut data, DISPLACEMENT_INDICATORS);

    let a = automation_speed_column(
        &data.column_or_missing(&norm_column("Unemp")),
        &data.column_or_missing(&norm_column("EmpPop")),
    );

    let population: Vec<Option<f64>> = data
        .areas()
        .iter()
        .map(|area| population_for(area).map(|p| p as f64))
        .collect();
    let employment: Vec<Option<f64>> = data
        .column_or_missing("EmpPop")
        .into_iter()
        .zip(data.areas())
        .map(|(ratio, area)| employment_from_ratio(ratio?, population_for(area)?))
        .collect();
    diags.success(format!(
        "Calculated Employment from Employment-to-population ratio and population proxy. {} rows with valid employment data.",
        employment.iter().flatten().count()
    ));

    let time_years: Vec<f64> = data
        .years()
        .iter()
        .zip(data.min_year_per_area())
        .map(|(&y, min)| f64::from(y - min))
        .collect();

    let model = config.displacement;
    let raw: Vec<Option<f64>> = employment
        .iter()
        .zip(&a)
        .zip(&time_years)
        .map(|((&d0, &a), &t)| d0.filter(|d| *d > 0.0).and_then(|d| model.raw(d, a, t)))
        .collect();
    let pct: Vec<Option<f64>> = employment
        .iter()
        .zip(&raw)
        .map(|(&d0, &d)| percent_change(d0, d))
        .collect();
    if pct.iter().all(Option::is_none) {
        diags.warn(
            "No EDM_pct values available (likely missing employment). Setting EDM_index=0 for visualization.",
        );
    }
    let index = percentile_index(&pct);
    let to_threshold: Vec<Option<f64>> = a
        .iter()
        .zip(&employment)
        .map(|(&a, &d0)| {
            let d0 = d0?;
            model.time_to_threshold(d0, a, config.threshold_pct)
        })
        .collect();

    data.set_dense_column(AUTOMATION_SPEED, a);
    data.set_column(POPULATION, population);
    data.set_column(EMPLOYMENT, employment);
    data.set_dense_column(TIME_YEARS, time_years);
    data.set_column(EDM_RAW, raw);
    data.set_column(EDM_PCT, pct);
    data.set_dense_column(EDM_INDEX, index);
    data.set_column(YEARS_TO_THRESHOLD, to_threshold);

    let mut out = data.project(OUTPUT_COLUMNS);
    out.sort_by_area_year();
    diags.success(format!(
        "Displacement loader prepared {} rows from {} source files.",
        out.len(),
        tables.len()
    ));

    IndexReport {
        table: out,
        diagnostics: diags,
        sources: tables.len(),
    }
}
