// src/pipeline/mod.rs
pub mod displacement;
pub mod productivity;
pub mod risk;

use std::path::Path;
use tracing::debug;

use crate::config::IngestOptions;
use crate::diagnostics::{Diagnostic, Diagnostics, Level};
use crate::ingest::{load_indicator, IndicatorTable};
use crate::merge::WideTable;
use crate::normalize::{min_max, NEUTRAL};
use crate::resolve::{list_data_files, resolve_all, IndicatorSpec};

pub use displacement::load_displacement_dataset;
pub use productivity::load_productivity_dataset;
pub use risk::load_risk_dataset;

/// Name of the composite automation-speed column.
pub const AUTOMATION_SPEED: &str = "A";

/// A finished table plus everything worth telling the caller about how it
/// was built. An empty table means "no data available".
#[derive(Clone, Debug, Default)]
pub struct IndexReport {
    pub table: WideTable,
    pub diagnostics: Diagnostics,
    /// Number of source files that made it into the merge.
    pub sources: usize,
}

impl IndexReport {
    fn empty(diagnostics: Diagnostics) -> Self {
        Self {
            table: WideTable::new(),
            diagnostics,
            sources: 0,
        }
    }
}

/// Column holding the normalised variant of indicator `key`.
pub fn norm_column(key: &str) -> String {
    format!("{}_norm", key)
}

/// Scan `dir`, resolve every indicator in `specs` and load what was found.
///
/// Missing indicators are reported as info, unusable files as warnings.
/// The returned tables keep `specs` order.
pub(crate) fn load_sources(
    dir: &Path,
    specs: &[IndicatorSpec],
    options: IngestOptions,
    diags: &mut Diagnostics,
) -> Vec<IndicatorTable> {
    diags.info(format!(
        "Searching {} for indicator files (flexible filename matching)...",
        dir.display()
    ));
    let files = match list_data_files(dir) {
        Ok(f) => f,
        Err(e) => {
            diags.error(format!("Could not list {}: {:#}", dir.display(), e));
            return Vec::new();
        }
    };

    let mut tables = Vec::new();
    for (spec, res) in specs.iter().zip(resolve_all(specs, &files)) {
        let Some((file, kind)) = res.found else {
            diags.push(
                Diagnostic::new(
                    Level::Info,
                    format!(
                        "No file found for '{}' (tokens={:?}). This indicator will use neutral defaults.",
                        spec.key, spec.tokens
                    ),
                )
                .indicator(spec.key),
            );
            continue;
        };
        debug!(key = spec.key, file = %file, ?kind, "resolved");

        match load_indicator(dir.join(&file), spec.key, options.duplicate_policy) {
            Ok(table) => {
                diags.push(
                    Diagnostic::new(
                        Level::Info,
                        format!("Loaded {} ({} rows)", file, table.rows.len()),
                    )
                    .indicator(spec.key)
                    .file(&file),
                );
                tables.push(table);
            }
            Err(e) => diags.push(
                Diagnostic::new(Level::Warning, format!("Skipping {}: {:#}", file, e))
                    .indicator(spec.key)
                    .file(&file),
            ),
        }
    }
    tables
}

/// Add a `<key>_norm` column for each indicator. Indicators that never
/// loaded get the neutral value on every row.
pub(crate) fn normalize_indicators(wide: &mut WideTable, specs: &[IndicatorSpec]) {
    for spec in specs {
        let normed = match wide.column(spec.key) {
            Some(col) => min_max(col),
            None => vec![Some(NEUTRAL); wide.len()],
        };
        wide.set_column(&norm_column(spec.key), normed);
    }
}

/// Normalised column `key`, with missing rows at the neutral value.
pub(crate) fn norm_or_neutral(wide: &WideTable, key: &str) -> Vec<f64> {
    wide.column_or_missing(&norm_column(key))
        .into_iter()
        .map(|v| v.unwrap_or(NEUTRAL))
        .collect()
}

pub(crate) fn no_data(mut diags: Diagnostics) -> IndexReport {
    diags.error(
        "No usable indicator files found (after flexible matching). Place the CSVs in the data directory.",
    );
    IndexReport::empty(diags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::catalog::{EMP_POP, NEET, UNEMP};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_sources_reports_each_outcome() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Unemployment rate.csv"),
            "Area,Year,Total\nKenya,2019,5\n",
        )
        .unwrap();
        fs::write(dir.path().join("youth_neet.csv"), "Name\nx\n").unwrap();

        let mut diags = Diagnostics::new();
        let tables = load_sources(
            dir.path(),
            &[UNEMP, EMP_POP, NEET],
            IngestOptions::default(),
            &mut diags,
        );

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].key, "Unemp");
        let warnings: Vec<_> = diags.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].indicator.as_deref(), Some("NEET"));
        assert!(diags
            .events()
            .iter()
            .any(|d| d.indicator.as_deref() == Some("EmpPop") && d.level == Level::Info));
    }

    #[test]
    fn test_unreadable_file_is_skipped_with_warning() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Unemployment rate.xlsx"), b"PK\x03\x04").unwrap();
        fs::write(
            dir.path().join("Employment to population ratio.csv"),
            "Area,Year,Total\nKenya,2019,60\n",
        )
        .unwrap();

        let mut diags = Diagnostics::new();
        let tables = load_sources(
            dir.path(),
            &[EMP_POP, UNEMP],
            IngestOptions::default(),
            &mut diags,
        );

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].key, "EmpPop");
        let warnings: Vec<_> = diags.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].indicator.as_deref(), Some("Unemp"));
        assert_eq!(warnings[0].file.as_deref(), Some("Unemployment rate.xlsx"));
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_missing_dir_is_error_diagnostic() {
        let dir = tempdir().unwrap();
        let mut diags = Diagnostics::new();
        let tables = load_sources(
            &dir.path().join("absent"),
            &[UNEMP],
            IngestOptions::default(),
            &mut diags,
        );
        assert!(tables.is_empty());
        assert!(diags.has_errors());
    }
}
