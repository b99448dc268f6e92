use anyhow::{Context, Result};
use automation_index::{
    config::{Paths, PipelineConfig},
    diagnostics::Diagnostics,
    export::write_parquet,
    model::{
        displacement::DisplacementPoint, linspace, productivity::ProductivityPoint,
        risk::RiskScenario, CurveMode,
    },
    occupation::load_onet_analysis,
    pipeline::{
        load_displacement_dataset, load_productivity_dataset, load_risk_dataset, IndexReport,
    },
};
use serde::Serialize;
use std::{collections::BTreeMap, fs, path::Path};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Points per scenario sweep over A.
const SWEEP_POINTS: usize = 50;
/// Baseline used for the illustrative sweeps.
const SWEEP_BASELINE: f64 = 100_000.0;
const SWEEP_YEARS: f64 = 10.0;

#[derive(Serialize)]
struct Scenarios {
    displacement: Vec<DisplacementPoint>,
    productivity: Vec<ProductivityPoint>,
    risk: BTreeMap<String, Vec<RiskScenario>>,
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("writing {:?}", path))
}

/// Write a pipeline's table, and its latest-year snapshot, unless empty.
fn write_report(name: &str, report: &IndexReport, out_dir: &Path) -> Result<()> {
    if report.table.is_empty() {
        warn!(name, "no data available; nothing written");
        return Ok(());
    }
    write_parquet(&report.table, out_dir.join(format!("{}.parquet", name)))?;
    write_parquet(
        &report.table.latest_per_area(),
        out_dir.join(format!("{}_latest.parquet", name)),
    )?;
    info!(name, rows = report.table.len(), sources = report.sources, "report written");
    Ok(())
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure dirs ───────────────────────────────────────────
    let paths = Paths::from_env();
    let config = PipelineConfig::default();
    fs::create_dir_all(&paths.out_dir)
        .with_context(|| format!("creating output directory {:?}", &paths.out_dir))?;
    info!(data = %paths.data_dir.display(), out = %paths.out_dir.display(), "directories");

    // ─── 3) country indices ──────────────────────────────────────────
    let mut all = BTreeMap::new();
    for (name, report) in [
        ("edm", load_displacement_dataset(&paths.data_dir, &config)),
        ("pgi", load_productivity_dataset(&paths.data_dir, &config)),
        ("eri", load_risk_dataset(&paths.data_dir, &config)),
    ] {
        write_report(name, &report, &paths.out_dir)?;
        all.insert(name.to_string(), report.diagnostics);
    }

    // ─── 4) occupations ──────────────────────────────────────────────
    let occupations = load_onet_analysis(&paths.data_dir);
    if !occupations.risks.is_empty() {
        write_json(&occupations.risks, &paths.out_dir.join("occupation_risk.json"))?;
        write_json(&occupations.skills, &paths.out_dir.join("skills.json"))?;
        write_json(&occupations.technology, &paths.out_dir.join("technology.json"))?;
    }
    all.insert("onet".to_string(), occupations.diagnostics);

    // ─── 5) scenario sweeps ──────────────────────────────────────────
    let a_values = linspace(0.0, 1.0, SWEEP_POINTS);
    let scenarios = Scenarios {
        displacement: config.displacement.sweep(SWEEP_BASELINE, SWEEP_YEARS, &a_values),
        productivity: config.productivity.sweep(SWEEP_BASELINE, &a_values),
        risk: CurveMode::ALL
            .into_iter()
            .map(|mode| {
                (
                    mode.to_string(),
                    config.risk.simulate_scenarios(&a_values, 0.5, 0.5, mode),
                )
            })
            .collect(),
    };
    write_json(&scenarios, &paths.out_dir.join("scenarios.json"))?;

    // ─── 6) diagnostics ──────────────────────────────────────────────
    let errors = all.values().filter(|d: &&Diagnostics| d.has_errors()).count();
    write_json(&all, &paths.out_dir.join("diagnostics.json"))?;
    info!(errors, "done");
    Ok(())
}
