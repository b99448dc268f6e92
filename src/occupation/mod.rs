// src/occupation/mod.rs
//! Occupation-level automation risk from O*NET extracts.
//!
//! Files are discovered by a single substring per table, read with the
//! same delimited reader as the indicator files, and scored row by row.
pub mod analysis;
pub mod scoring;

use std::path::Path;
use tracing::instrument;

use crate::diagnostics::{Diagnostic, Diagnostics, Level};
use crate::ingest::{read_delimited, RawTable};
use crate::resolve::list_data_files;

pub use analysis::{analyze_skills, analyze_technology, SkillLevel, TechnologyAdoption, Transferability};
pub use scoring::{score_occupations, OccupationRisk, RiskDistribution};

/// Extensions considered when scanning for O*NET tables.
const ONET_EXTENSIONS: &[&str] = &["csv", "tsv", "txt", "xlsx", "xls"];

/// O*NET table kinds and the filename substring that identifies each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OnetTable {
    Occupations,
    Tasks,
    Skills,
    Knowledge,
    Abilities,
    Technology,
}

impl OnetTable {
    pub const ALL: [OnetTable; 6] = [
        OnetTable::Occupations,
        OnetTable::Tasks,
        OnetTable::Skills,
        OnetTable::Knowledge,
        OnetTable::Abilities,
        OnetTable::Technology,
    ];

    pub fn pattern(&self) -> &'static str {
        match self {
            OnetTable::Occupations => "occupation",
            OnetTable::Tasks => "task",
            OnetTable::Skills => "skills",
            OnetTable::Knowledge => "knowledge",
            OnetTable::Abilities => "abilities",
            OnetTable::Technology => "technolog",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OnetTable::Occupations => "occupations",
            OnetTable::Tasks => "task_statements",
            OnetTable::Skills => "skills",
            OnetTable::Knowledge => "knowledge",
            OnetTable::Abilities => "abilities",
            OnetTable::Technology => "technology",
        }
    }
}

/// Every O*NET table that was found and read.
#[derive(Clone, Debug, Default)]
pub struct OnetTables {
    tables: Vec<(OnetTable, RawTable)>,
}

impl OnetTables {
    pub fn get(&self, kind: OnetTable) -> Option<&RawTable> {
        self.tables.iter().find(|(k, _)| *k == kind).map(|(_, t)| t)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Everything derived from one O*NET directory.
#[derive(Clone, Debug, Default)]
pub struct OccupationReport {
    pub risks: Vec<OccupationRisk>,
    pub distribution: RiskDistribution,
    pub skills: Vec<SkillLevel>,
    pub technology: Vec<TechnologyAdoption>,
    pub diagnostics: Diagnostics,
}

/// First file whose lowercased name contains `pattern`.
pub fn find_file_by_pattern<'a>(pattern: &str, files: &'a [String]) -> Option<&'a str> {
    let pattern = pattern.to_lowercase();
    files
        .iter()
        .find(|f| f.to_lowercase().contains(&pattern))
        .map(String::as_str)
}

/// Column index of the first header matching any of `names`, tried in
/// order. A header matches when either lowercased string contains the other.
pub fn find_column(headers: &[String], names: &[&str]) -> Option<usize> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    names.iter().find_map(|name| {
        let name = name.to_lowercase();
        lowered
            .iter()
            .position(|col| !col.is_empty() && (name.contains(col.as_str()) || col.contains(&name)))
    })
}

/// Scan `dir` for O*NET tables and read every one found.
#[instrument(level = "info", skip(dir, diags), fields(dir = %dir.as_ref().display()))]
pub fn load_onet_files<P: AsRef<Path>>(dir: P, diags: &mut Diagnostics) -> OnetTables {
    let dir = dir.as_ref();
    diags.info("Searching for O*NET files (CSV or Excel)...");
    let files: Vec<String> = match list_data_files(dir) {
        Ok(files) => files
            .into_iter()
            .filter(|f| {
                Path::new(f)
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| ONET_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            })
            .collect(),
        Err(e) => {
            diags.error(format!("Could not list {}: {:#}", dir.display(), e));
            return OnetTables::default();
        }
    };
    if files.is_empty() {
        diags.error("No CSV or Excel files found in the data directory");
        return OnetTables::default();
    }
    diags.info(format!("Found {} files", files.len()));

    let mut out = OnetTables::default();
    for kind in OnetTable::ALL {
        let Some(file) = find_file_by_pattern(kind.pattern(), &files) else {
            diags.info(format!("Skipping '{}' - file not found (optional)", kind.name()));
            continue;
        };
        match read_delimited(dir.join(file)) {
            Ok(table) if !table.is_empty() => {
                diags.push(
                    Diagnostic::new(
                        Level::Success,
                        format!(
                            "Loaded: {} ({} rows, {} cols)",
                            file,
                            table.rows.len(),
                            table.num_columns()
                        ),
                    )
                    .file(file),
                );
                out.tables.push((kind, table));
            }
            Ok(_) => diags.push(
                Diagnostic::new(Level::Warning, format!("File {} was empty", file)).file(file),
            ),
            Err(e) => diags.push(
                Diagnostic::new(Level::Warning, format!("Could not read {}: {:#}", file, e))
                    .file(file),
            ),
        }
    }

    if out.is_empty() {
        diags.error("No valid O*NET files loaded");
    } else {
        diags.success(format!("O*NET loader: {} files loaded successfully", out.len()));
    }
    out
}

/// Load O*NET tables from `dir` and derive occupation risk, skills and
/// technology views. Nothing here is fatal: absent tables yield empty views.
pub fn load_onet_analysis<P: AsRef<Path>>(dir: P) -> OccupationReport {
    let mut diags = Diagnostics::new();
    let tables = load_onet_files(dir, &mut diags);
    if tables.is_empty() {
        return OccupationReport {
            diagnostics: diags,
            ..OccupationReport::default()
        };
    }

    let risks = match tables.get(OnetTable::Occupations) {
        Some(t) => score_occupations(t, &mut diags),
        None => {
            diags.error("Occupations data not loaded");
            Vec::new()
        }
    };
    let distribution = RiskDistribution::from_scores(&risks);
    if !risks.is_empty() {
        diags.info(format!(
            "Low: {} | Medium: {} | High: {}",
            distribution.low, distribution.medium, distribution.high
        ));
    }

    let skills = match tables.get(OnetTable::Skills) {
        Some(t) => analyze_skills(t, &mut diags),
        None => {
            diags.warn("Skills data not available");
            Vec::new()
        }
    };
    let technology = match tables.get(OnetTable::Technology) {
        Some(t) => analyze_technology(t, &mut diags),
        None => {
            diags.warn("Technology data not available");
            Vec::new()
        }
    };

    OccupationReport {
        risks,
        distribution,
        skills,
        technology,
        diagnostics: diags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_find_column_is_bidirectional() {
        let headers: Vec<String> = ["O*NET-SOC Code", "Title", "Data Value"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(find_column(&headers, &["Code"]), Some(0));
        assert_eq!(find_column(&headers, &["Job Title"]), Some(1));
        assert_eq!(find_column(&headers, &["Importance", "Value"]), Some(2));
        assert_eq!(find_column(&headers, &["Skill"]), None);
    }

    #[test]
    fn test_find_file_by_pattern() {
        let files = vec!["Occupation Data.csv".to_string(), "Skills.csv".to_string()];
        assert_eq!(find_file_by_pattern("skills", &files), Some("Skills.csv"));
        assert_eq!(find_file_by_pattern("technolog", &files), None);
    }

    #[test]
    fn test_full_analysis() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Occupation Data.csv"),
            "O*NET-SOC Code,Title,Routine,Manual,Cognitive,Social\n\
             43-9021.00,Data Entry Keyers,0.9,0.8,0.1,0.2\n\
             29-1141.00,Registered Nurses,0.1,0.2,0.9,0.9\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("Skills.csv"),
            "Element Name,Data Value\nReading,4\nWriting,2\n",
        )
        .unwrap();
        fs::write(dir.path().join("Abilities.xlsx"), b"PK").unwrap();

        let report = load_onet_analysis(dir.path());
        assert_eq!(report.risks.len(), 2);
        assert_eq!(report.distribution.high, 1);
        assert_eq!(report.distribution.low, 1);
        assert_eq!(report.skills.len(), 2);
        assert!(report.technology.is_empty());

        let warnings: Vec<_> = report.diagnostics.warnings().collect();
        assert!(warnings.iter().any(|d| d.file.as_deref() == Some("Abilities.xlsx")));
        assert!(warnings.iter().any(|d| d.message == "Technology data not available"));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempdir().unwrap();
        let report = load_onet_analysis(dir.path());
        assert!(report.risks.is_empty());
        assert!(report.diagnostics.has_errors());
    }
}
