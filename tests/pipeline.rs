use automation_index::{
    config::PipelineConfig,
    diagnostics::Level,
    export::write_parquet,
    pipeline::{load_displacement_dataset, load_productivity_dataset, load_risk_dataset},
};
use std::{fs, path::Path};
use tempfile::tempdir;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,automation_index=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Seven indicator files with mixed layouts: conventional names, a
/// semicolon file, a tab file with lowercase headers, and a fuzzy name.
fn write_fixture(dir: &Path) {
    let files = [
        (
            "Earnings.csv",
            "Area,Sex,Year,Total\nChile,T,2019,900\nChile,T,2020,1000\nPeru,T,2020,600\n",
        ),
        (
            "Employment to population ratio.csv",
            "Area;Year;Total\nChile;2019;58\nChile;2020;55\nPeru;2020;70\n",
        ),
        (
            "Unemployment rate.csv",
            "Country,Year,Value\nChile,2019,7\nChile,2020,11\nPeru,2020,7\n",
        ),
        (
            "labour_force_participation.tsv",
            "country\ttime\tobs_value\nChile\t2020\t60\nPeru\t2020\t72\n",
        ),
        (
            "informal employment rate (ILO).csv",
            "Area,Year,Total\nChile,2020,27\nPeru,2020,68\n",
        ),
        ("working poverty rate.csv", "Area,Year,Total\nPeru,2020,5\n"),
        ("notes.txt", "this is not a table\n"),
    ];
    for (name, body) in files {
        fs::write(dir.join(name), body).unwrap();
    }
}

#[test]
fn empty_directory_is_terminal_no_data() {
    init_test_logging();
    let dir = tempdir().unwrap();
    let config = PipelineConfig::default();

    for report in [
        load_displacement_dataset(dir.path(), &config),
        load_productivity_dataset(dir.path(), &config),
        load_risk_dataset(dir.path(), &config),
    ] {
        assert!(report.table.is_empty());
        assert_eq!(report.sources, 0);
        assert!(report
            .diagnostics
            .events()
            .iter()
            .any(|d| d.level == Level::Error && d.message.contains("No usable indicator files")));
    }
}

#[test]
fn all_three_indices_stay_in_unit_range() {
    init_test_logging();
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let config = PipelineConfig::default();

    let edm = load_displacement_dataset(dir.path(), &config);
    assert_eq!(edm.sources, 5);
    assert_eq!(edm.table.len(), 3);
    let pgi = load_productivity_dataset(dir.path(), &config);
    assert_eq!(pgi.sources, 6);
    let eri = load_risk_dataset(dir.path(), &config);
    assert_eq!(eri.sources, 6);

    for (report, column) in [(&edm, "EDM_index"), (&pgi, "PGI_index"), (&eri, "ERI")] {
        let values = report.table.column(column).unwrap();
        assert!(values
            .iter()
            .all(|v| matches!(v, Some(x) if (0.0..=1.0).contains(x))));
        let a = report.table.column("A").unwrap();
        assert!(a.iter().all(|v| matches!(v, Some(x) if (0.0..=1.0).contains(x))));
    }

    // NEET never resolved: reported as info, never as a warning
    let neet = edm
        .diagnostics
        .events()
        .iter()
        .find(|d| d.indicator.as_deref() == Some("NEET"))
        .unwrap();
    assert_eq!(neet.level, Level::Info);
    assert!(!eri.diagnostics.has_errors());
}

#[test]
fn latest_snapshot_exports() {
    init_test_logging();
    let dir = tempdir().unwrap();
    write_fixture(dir.path());
    let out = tempdir().unwrap();

    let report = load_risk_dataset(dir.path(), &PipelineConfig::default());
    let latest = report.table.latest_per_area();
    assert_eq!(latest.areas(), &["Chile", "Peru"]);
    assert_eq!(latest.years(), &[2020, 2020]);

    write_parquet(&latest, out.path().join("eri_latest.parquet")).unwrap();
    assert!(out.path().join("eri_latest.parquet").is_file());
}
