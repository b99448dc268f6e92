use serde::Serialize;
use std::collections::HashSet;

use super::find_column;
use crate::diagnostics::Diagnostics;
use crate::ingest::kinds::column_kinds;
use crate::ingest::utils::{clean_str, parse_value};
use crate::ingest::RawTable;

const SKILL_COLUMNS: &[&str] = &["Title", "Skill", "Name", "skill name"];
const TECHNOLOGY_COLUMNS: &[&str] = &["Technology Example", "Technology", "Name", "Title", "tech"];
const VALUE_COLUMNS: &[&str] = &["Data Value", "Value", "Level", "Importance"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Transferability {
    Low,
    Medium,
    High,
}

impl Transferability {
    /// High above 0.7, Medium above 0.4, Low otherwise.
    pub fn from_level(normalized: f64) -> Self {
        if normalized > 0.7 {
            Transferability::High
        } else if normalized > 0.4 {
            Transferability::Medium
        } else {
            Transferability::Low
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkillLevel {
    pub skill: String,
    pub level: f64,
    pub level_normalized: f64,
    pub transferability: Transferability,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TechnologyAdoption {
    pub technology: String,
    pub adoption: f64,
    pub adoption_normalized: f64,
}

/// (label, value) pairs from `table`: the label column by name (else
/// column 0), the value column by name (else the first numeric column).
/// Unparsable values count as 0.
fn labelled_values(
    table: &RawTable,
    label_names: &[&str],
    what: &str,
    diags: &mut Diagnostics,
) -> Option<Vec<(String, f64)>> {
    let label_col = find_column(&table.headers, label_names).unwrap_or(0);
    let value_col = find_column(&table.headers, VALUE_COLUMNS)
        .or_else(|| column_kinds(table).iter().position(|k| k.is_numeric()));
    let Some(value_col) = value_col else {
        diags.warn(format!("Could not find numeric value column in {} data", what));
        return None;
    };
    Some(
        table
            .rows
            .iter()
            .map(|row| (clean_str(&row[label_col]), parse_value(&row[value_col]).unwrap_or(0.0)))
            .collect(),
    )
}

/// Divide by the maximum when it is positive; otherwise leave as is.
fn scale_by_max(values: &[(String, f64)]) -> Vec<f64> {
    let max = values.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .map(|(_, v)| if max > 0.0 { v / max } else { *v })
        .collect()
}

/// Drop repeated (label, value) pairs, keeping the first.
fn dedup(pairs: Vec<(String, f64)>) -> Vec<(String, f64)> {
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|(label, v)| seen.insert((label.clone(), v.to_bits())))
        .collect()
}

/// Skill levels normalised by the strongest skill, with a transferability
/// grade.
pub fn analyze_skills(table: &RawTable, diags: &mut Diagnostics) -> Vec<SkillLevel> {
    let Some(pairs) = labelled_values(table, SKILL_COLUMNS, "skills", diags) else {
        return Vec::new();
    };
    let pairs = dedup(pairs);
    let scaled = scale_by_max(&pairs);
    pairs
        .into_iter()
        .zip(scaled)
        .map(|((skill, level), norm)| SkillLevel {
            skill,
            level,
            level_normalized: norm,
            transferability: Transferability::from_level(norm),
        })
        .collect()
}

/// Technology adoption normalised by the most adopted entry.
pub fn analyze_technology(table: &RawTable, diags: &mut Diagnostics) -> Vec<TechnologyAdoption> {
    let Some(pairs) = labelled_values(table, TECHNOLOGY_COLUMNS, "technology", diags) else {
        return Vec::new();
    };
    let pairs = dedup(pairs);
    let scaled = scale_by_max(&pairs);
    pairs
        .into_iter()
        .zip(scaled)
        .map(|((technology, adoption), norm)| TechnologyAdoption {
            technology,
            adoption,
            adoption_normalized: norm,
        })
        .collect()
}
