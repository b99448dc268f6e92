use std::path::Path;
use tracing::{debug, instrument};

use super::{
    load_sources, no_data, norm_column, norm_or_neutral, normalize_indicators, IndexReport,
    AUTOMATION_SPEED,
};
use crate::config::PipelineConfig;
use crate::diagnostics::Diagnostics;
use crate::index::automation_speed;
use crate::merge::outer_join;
use crate::resolve::catalog::{EARNINGS, INFORMAL, LABOUR_MARKET_INDICATORS, LFPR, NEET, POVERTY};

pub const WAGE_FACTOR: &str = "W";
pub const SKILL_INVESTMENT: &str = "S";
pub const ERI: &str = "ERI";

pub const OUTPUT_COLUMNS: &[&str] = &[AUTOMATION_SPEED, WAGE_FACTOR, SKILL_INVESTMENT, ERI];

/// Skill investment `S`: participation counts for, informality, working
/// poverty and NEET count against. Inputs are normalised.
pub fn skill_investment(lfpr: f64, informal: f64, poverty: f64, neet: f64) -> f64 {
    (lfpr + (1.0 - informal) + (1.0 - poverty) + (1.0 - neet)) / 4.0
}

/// Load labour-market indicators from `dir` and compute the employment risk
/// index per (Area, Year).
///
/// Rows with fewer than `config.risk_min_indicators` raw indicators are
/// dropped before normalisation.
#[instrument(level = "info", skip(dir, config), fields(dir = %dir.as_ref().display(), mode = %config.risk.mode))]
pub fn load_risk_dataset<P: AsRef<Path>>(dir: P, config: &PipelineConfig) -> IndexReport {
    let mut diags = Diagnostics::new();
    let tables = load_sources(dir.as_ref(), LABOUR_MARKET_INDICATORS, config.ingest, &mut diags);
    if tables.is_empty() {
        return no_data(diags);
    }

    let mut data = outer_join(&tables, Some(EARNINGS.key));
    let merged = data.len();
    let keys: Vec<&str> = LABOUR_MARKET_INDICATORS.iter().map(|s| s.key).collect();
    data.retain_min_present(&keys, config.risk_min_indicators);
    if data.len() < merged {
        diags.info(format!(
            "Dropped {} rows with fewer than {} indicators.",
            merged - data.len(),
            config.risk_min_indicators
        ));
    }
    debug!(kept = data.len(), merged, "sparse rows filtered");
    normalize_indicators(&mut data, LABOUR_MARKET_INDICATORS);

    let unemp = data.column_or_missing(&norm_column("Unemp"));
    let emp_pop = data.column_or_missing(&norm_column("EmpPop"));
    let w = norm_or_neutral(&data, EARNINGS.key);
    let lfpr = norm_or_neutral(&data, LFPR.key);
    let informal = norm_or_neutral(&data, INFORMAL.key);
    let poverty = norm_or_neutral(&data, POVERTY.key);
    let neet = norm_or_neutral(&data, NEET.key);

    let model = config.risk;
    let mut a = Vec::with_capacity(data.len());
    let mut s = Vec::with_capacity(data.len());
    let mut eri = Vec::with_capacity(data.len());
    for i in 0..data.len() {
        let a_i = automation_speed(unemp[i], emp_pop[i]);
        let s_i = skill_investment(lfpr[i], informal[i], poverty[i], neet[i]);
        eri.push(model.compute(a_i, w[i], s_i, model.mode));
        a.push(a_i);
        s.push(s_i);
    }

    data.set_dense_column(AUTOMATION_SPEED, a);
    data.set_dense_column(WAGE_FACTOR, w);
    data.set_dense_column(SKILL_INVESTMENT, s);
    data.set_dense_column(ERI, eri);

    let mut out = data.project(OUTPUT_COLUMNS);
    out.sort_by_area_year();
    diags.success(format!(
        "Risk loader prepared {} rows from {} source files ({} curve).",
        out.len(),
        tables.len(),
        model.mode
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
    use crate::model::{CurveMode, RiskModel};
    use std::fs;
    use tempfile::tempdir;

    fn write_inputs(dir: &Path) {
        fs::write(
            dir.join("Earnings.csv"),
            "Area,Year,Total\nChile,2020,1000\nPeru,2020,500\nFiji,2020,700\n",
        )
        .unwrap();
        fs::write(
            dir.join("Unemployment rate.csv"),
            "Area,Year,Total\nChile,2020,4\nPeru,2020,8\n",
        )
        .unwrap();
    }

    #[test]
    fn test_sparse_rows_are_dropped() {
        let dir = tempdir().unwrap();
        write_inputs(dir.path());

        let report = load_risk_dataset(dir.path(), &PipelineConfig::default());
        let t = &report.table;
        // Fiji only has earnings
        assert_eq!(t.areas(), &["Chile", "Peru"]);

        // Earnings renormalise over the kept rows only
        assert_eq!(t.column(WAGE_FACTOR).unwrap(), &[Some(1.0), Some(0.0)]);
        assert_eq!(t.column(SKILL_INVESTMENT).unwrap(), &[Some(0.5), Some(0.5)]);
        assert_eq!(t.column(AUTOMATION_SPEED).unwrap(), &[Some(0.25), Some(0.75)]);
        // linear: 0.25 * 1.0 / 1.5
        assert_eq!(t.column(ERI).unwrap(), &[Some(0.1667), Some(0.0)]);
    }

    #[test]
    fn test_mode_from_config() {
        let dir = tempdir().unwrap();
        write_inputs(dir.path());
        let config = PipelineConfig {
            risk: RiskModel::with_mode(CurveMode::Quadratic),
            risk_min_indicators: 1,
            ..PipelineConfig::default()
        };

        let report = load_risk_dataset(dir.path(), &config);
        let t = &report.table;
        assert_eq!(t.len(), 3);
        // 0.25^2 * 1.0 / 1.5
        assert_eq!(t.column(ERI).unwrap()[0], Some(0.0417));
    }

    #[test]
    fn test_skill_investment_neutral() {
        assert_eq!(skill_investment(0.5, 0.5, 0.5, 0.5), 0.5);
        assert_eq!(skill_investment(1.0, 0.0, 0.0, 0.0), 1.0);
    }
}
