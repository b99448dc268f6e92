use std::path::Path;
use tracing::instrument;

use super::{
    load_sources, no_data, norm_column, normalize_indicators, IndexReport, AUTOMATION_SPEED,
};
use crate::config::PipelineConfig;
use crate::diagnostics::Diagnostics;
use crate::index::{automation_speed_column, percentile_index};
use crate::merge::outer_join;
use crate::resolve::catalog::{EARNINGS, LABOUR_MARKET_INDICATORS};

pub const PGI_RAW: &str = "PGI_raw";
pub const PGI_PCT: &str = "PGI_pct";
pub const PGI_INDEX: &str = "PGI_index";

pub const OUTPUT_COLUMNS: &[&str] = &[AUTOMATION_SPEED, "Earnings", PGI_RAW, PGI_PCT, PGI_INDEX];

/// Load labour-market indicators from `dir` and compute the productivity
/// gain index per (Area, Year), with earnings as the baseline `P0`.
#[instrument(level = "info", skip(dir, config), fields(dir = %dir.as_ref().display()))]
pub fn load_productivity_dataset<P: AsRef<Path>>(dir: P, config: &PipelineConfig) -> IndexReport {
    let mut diags = Diagnostics::new();
    let tables = load_sources(dir.as_ref(), LABOUR_MARKET_INDICATORS, config.ingest, &mut diags);
    if tables.is_empty() {
        return no_data(diags);
    }
    if !tables.iter().any(|t| t.key == EARNINGS.key) {
        diags.warn(format!(
            "'{}' not found; using '{}' as base; productivity gain requires earnings (P0).",
            EARNINGS.key, tables[0].key
        ));
    }

    let mut data = outer_join(&tables, Some(EARNINGS.key));
    normalize_indicators(&mut data, LABOUR_MARKET_INDICATORS);

    let a = automation_speed_column(
        &data.column_or_missing(&norm_column("Unemp")),
        &data.column_or_missing(&norm_column("EmpPop")),
    );
    let earnings = data.column_or_missing(EARNINGS.key);

    let model = config.productivity;
    let raw: Vec<Option<f64>> = earnings
        .iter()
        .zip(&a)
        .map(|(&p0, &a)| model.raw(p0?, a))
        .collect();
    let pct: Vec<Option<f64>> = earnings
        .iter()
        .zip(&a)
        .map(|(&p0, &a)| model.percent(p0?, a))
        .collect();
    if pct.iter().all(Option::is_none) {
        diags.warn(
            "No PGI_pct values available (likely missing earnings). Setting PGI_index=0 for visualization.",
        );
    }
    let index = percentile_index(&pct);

    data.set_dense_column(AUTOMATION_SPEED, a);
    data.set_column(EARNINGS.key, earnings);
    data.set_column(PGI_RAW, raw);
    data.set_column(PGI_PCT, pct);
    data.set_dense_column(PGI_INDEX, index);

    let mut out = data.project(OUTPUT_COLUMNS);
    out.sort_by_area_year();
    diags.success(format!(
        "Productivity loader prepared {} rows from {} source files.",
        out.len(),
        tables.len()
    ));

    IndexReport {
        table: out,
        diagnostics: diags,
        sources: tables.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Level;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_productivity_uses_earnings_baseline() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Earnings.csv"),
            "Area,Year,Total\nChile,2020,1000\nPeru,2020,800\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Unemployment rate.csv"),
            "Area,Year,Total\nChile,2020,10\nPeru,2020,5\nPeru,2021,7\n",
        )
        .unwrap();

        let report = load_productivity_dataset(dir.path(), &PipelineConfig::default());
        let t = &report.table;
        assert_eq!(t.len(), 3);
        assert_eq!(t.areas(), &["Chile", "Peru", "Peru"]);

        // Chile has the highest unemployment; EmpPop is absent so it sits at 0.5
        let a = t.column(AUTOMATION_SPEED).unwrap();
        assert_eq!(a[0], Some(0.75));
        assert_eq!(a[1], Some(0.25));

        let raw = t.column(PGI_RAW).unwrap();
        assert_eq!(raw[0], Some(1000.0 * (1.0 + 0.4 * 0.75)));
        assert_eq!(raw[2], None);

        let index = t.column(PGI_INDEX).unwrap();
        assert_eq!(index[0], Some(1.0));
        assert_eq!(index[1], Some(0.0));
        assert_eq!(index[2], Some(0.0));
        assert!(report.diagnostics.warnings().next().is_none());
    }

    #[test]
    fn test_missing_earnings_is_warned() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Unemployment rate.csv"),
            "Area,Year,Total\nChile,2020,10\n",
        )
        .unwrap();

        let report = load_productivity_dataset(dir.path(), &PipelineConfig::default());
        assert_eq!(report.table.len(), 1);
        assert_eq!(report.table.column(PGI_INDEX).unwrap(), &[Some(0.0)]);
        let warnings: Vec<_> = report.diagnostics.warnings().collect();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|d| d.level == Level::Warning));
        assert!(warnings[0].message.contains("'Earnings' not found"));
    }
}
