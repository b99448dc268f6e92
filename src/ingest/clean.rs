use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::columns::ColumnRoles;
use super::raw_table::RawTable;
use super::utils::{clean_str, is_missing, parse_value, parse_year};

/// One (Area, Year, Value) observation of an indicator.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub area: String,
    pub year: i32,
    pub value: Option<f64>,
}

/// A cleaned single-indicator table, created once per resolved file.
#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorTable {
    /// Indicator key, also the column name it gets in the merged table.
    pub key: String,
    /// File the rows were read from.
    pub source: String,
    pub rows: Vec<Observation>,
}

/// What to do when one source file repeats an (Area, Year) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    KeepFirst,
    #[default]
    KeepLast,
    /// Average the non-missing values of the repeated rows.
    Mean,
    /// Reject the whole file.
    Reject,
}

/// Project the inferred columns out of `table`.
///
/// Area is trimmed and rows with a missing area or a year that is not an
/// integer are dropped. Values that do not parse become missing.
pub fn clean_rows(table: &RawTable, roles: ColumnRoles) -> Vec<Observation> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            let area_cell = &row[roles.area];
            if is_missing(area_cell) {
                return None;
            }
            let year = parse_year(&row[roles.year])?;
            Some(Observation {
                area: clean_str(area_cell),
                year,
                value: parse_value(&row[roles.value]),
            })
        })
        .collect()
}

/// Collapse repeated (Area, Year) keys according to `policy`.
/// Output keeps the order in which each key first appeared.
pub fn apply_duplicate_policy(
    rows: Vec<Observation>,
    policy: DuplicatePolicy,
) -> Result<Vec<Observation>> {
    let mut index: HashMap<(String, i32), usize> = HashMap::with_capacity(rows.len());
    let mut out: Vec<Observation> = Vec::with_capacity(rows.len());
    // (sum, count) of present values per output row, only used by Mean
    let mut sums: Vec<(f64, usize)> = Vec::new();
    let mut duplicates = 0usize;

    for obs in rows {
        let key = (obs.area.clone(), obs.year);
        match index.get(&key) {
            None => {
                index.insert(key, out.len());
                sums.push(obs.value.map_or((0.0, 0), |v| (v, 1)));
                out.push(obs);
            }
            Some(&i) => {
                duplicates += 1;
                match policy {
                    DuplicatePolicy::KeepFirst => {}
                    DuplicatePolicy::KeepLast => out[i].value = obs.value,
                    DuplicatePolicy::Mean => {
                        if let Some(v) = obs.value {
                            sums[i].0 += v;
                            sums[i].1 += 1;
                        }
                    }
                    DuplicatePolicy::Reject => {}
                }
            }
        }
    }

    if duplicates > 0 && policy == DuplicatePolicy::Reject {
        bail!("{} duplicate (Area, Year) rows", duplicates);
    }
    if policy == DuplicatePolicy::Mean {
        for (obs, (sum, n)) in out.iter_mut().zip(sums) {
            obs.value = (n > 0).then(|| sum / n as f64);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(area: &str, year: i32, value: Option<f64>) -> Observation {
        Observation {
            area: area.to_string(),
            year,
            value,
        }
    }

    #[test]
    fn test_clean_rows_drops_bad_keys() {
        let table = RawTable::new(
            vec!["Area".into(), "Year".into(), "Total".into()],
            vec![
                vec![" Kenya ".into(), "2019".into(), "5.5".into()],
                vec!["".into(), "2019".into(), "1".into()],
                vec!["Chad".into(), "soon".into(), "1".into()],
                vec!["Chad".into(), "2020.0".into(), "x".into()],
            ],
        );
        let rows = clean_rows(&table, ColumnRoles { area: 0, year: 1, value: 2 });
        assert_eq!(
            rows,
            vec![obs("Kenya", 2019, Some(5.5)), obs("Chad", 2020, None)]
        );
    }

    fn dupes() -> Vec<Observation> {
        vec![
            obs("Peru", 2019, Some(2.0)),
            obs("Chile", 2019, Some(9.0)),
            obs("Peru", 2019, Some(4.0)),
            obs("Peru", 2019, None),
        ]
    }

    #[test]
    fn test_keep_first_and_last() {
        let first = apply_duplicate_policy(dupes(), DuplicatePolicy::KeepFirst).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].value, Some(2.0));

        let last = apply_duplicate_policy(dupes(), DuplicatePolicy::KeepLast).unwrap();
        assert_eq!(last[0].value, None);
        assert_eq!(last[1].area, "Chile");
    }

    #[test]
    fn test_mean_ignores_missing() {
        let mean = apply_duplicate_policy(dupes(), DuplicatePolicy::Mean).unwrap();
        assert_eq!(mean[0].value, Some(3.0));
        assert_eq!(mean[1].value, Some(9.0));
    }

    #[test]
    fn test_reject() {
        let err = apply_duplicate_policy(dupes(), DuplicatePolicy::Reject).unwrap_err();
        assert!(err.to_string().contains("2 duplicate"));

        let unique = vec![obs("Peru", 2019, Some(1.0)), obs("Peru", 2020, Some(1.0))];
        assert_eq!(
            apply_duplicate_policy(unique, DuplicatePolicy::Reject)
                .unwrap()
                .len(),
            2
        );
    }
}
