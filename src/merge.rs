// src/merge.rs

use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::ingest::IndicatorTable;

/// Wide per-(Area, Year) table: one nullable float column per indicator plus
/// whatever derived columns the pipelines add.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WideTable {
    areas: Vec<String>,
    years: Vec<i32>,
    /// Named columns in insertion order, each `len()` long.
    columns: Vec<(String, Vec<Option<f64>>)>,
}

impl WideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn areas(&self) -> &[String] {
        &self.areas
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// The named column, or an all-missing column when it does not exist.
    pub fn column_or_missing(&self, name: &str) -> Vec<Option<f64>> {
        self.column(name)
            .map(<[Option<f64>]>::to_vec)
            .unwrap_or_else(|| vec![None; self.len()])
    }

    /// Insert or replace a column.
    ///
    /// # Panics
    /// If `values` does not have one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<Option<f64>>) {
        assert_eq!(values.len(), self.len(), "column `{}` has wrong length", name);
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, col)) => *col = values,
            None => self.columns.push((name.to_string(), values)),
        }
    }

    /// Convenience for dense derived columns.
    pub fn set_dense_column(&mut self, name: &str, values: Vec<f64>) {
        self.set_column(name, values.into_iter().map(Some).collect());
    }

    /// Keep only rows whose index satisfies `keep`.
    pub fn retain_rows(&mut self, keep: impl Fn(usize) -> bool) {
        let mask: Vec<bool> = (0..self.len()).map(keep).collect();
        retain_by_mask(&mut self.areas, &mask);
        retain_by_mask(&mut self.years, &mask);
        for (_, col) in &mut self.columns {
            retain_by_mask(col, &mask);
        }
    }

    /// Drop rows where fewer than `min` of `names` are present.
    pub fn retain_min_present(&mut self, names: &[&str], min: usize) {
        let cols: Vec<Vec<Option<f64>>> = names.iter().map(|n| self.column_or_missing(n)).collect();
        self.retain_rows(|row| cols.iter().filter(|c| c[row].is_some()).count() >= min);
    }

    /// Reorder rows by (Area, Year) ascending.
    pub fn sort_by_area_year(&mut self) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| {
            (self.areas[a].as_str(), self.years[a]).cmp(&(self.areas[b].as_str(), self.years[b]))
        });
        self.areas = order.iter().map(|&i| self.areas[i].clone()).collect();
        self.years = order.iter().map(|&i| self.years[i]).collect();
        for (_, col) in &mut self.columns {
            *col = order.iter().map(|&i| col[i]).collect();
        }
    }

    /// Keep Area, Year and the listed columns, in the listed order. Listed
    /// columns that were never computed come back all-missing.
    pub fn project(&self, names: &[&str]) -> WideTable {
        WideTable {
            areas: self.areas.clone(),
            years: self.years.clone(),
            columns: names
                .iter()
                .map(|n| (n.to_string(), self.column_or_missing(n)))
                .collect(),
        }
    }

    /// One row per Area: the one with the greatest Year.
    pub fn latest_per_area(&self) -> WideTable {
        let mut best: HashMap<&str, usize> = HashMap::new();
        for (i, area) in self.areas.iter().enumerate() {
            best.entry(area.as_str())
                .and_modify(|b| {
                    if self.years[i] >= self.years[*b] {
                        *b = i;
                    }
                })
                .or_insert(i);
        }
        let mut out = self.clone();
        out.retain_rows(|i| best.get(self.areas[i].as_str()) == Some(&i));
        out.sort_by_area_year();
        out
    }

    /// Per-row group minimum of Year within each Area.
    pub fn min_year_per_area(&self) -> Vec<i32> {
        let mut mins: HashMap<&str, i32> = HashMap::new();
        for (area, &year) in self.areas.iter().zip(&self.years) {
            mins.entry(area.as_str())
                .and_modify(|m| *m = (*m).min(year))
                .or_insert(year);
        }
        self.areas.iter().map(|a| mins[a.as_str()]).collect()
    }
}

fn retain_by_mask<T>(v: &mut Vec<T>, mask: &[bool]) {
    let mut i = 0;
    v.retain(|_| {
        let k = mask[i];
        i += 1;
        k
    });
}

/// Full outer join of indicator tables on (Area, Year).
///
/// The base is the table keyed `primary` when present, otherwise the first
/// table; the rest merge in slice order. Rows are never dropped: a key seen
/// in only one table gets missing values in every other indicator column.
/// Input tables are expected to have unique keys (see
/// [`crate::ingest::DuplicatePolicy`]).
#[instrument(level = "debug", skip(tables), fields(tables = tables.len()))]
pub fn outer_join(tables: &[IndicatorTable], primary: Option<&str>) -> WideTable {
    let base = primary
        .and_then(|p| tables.iter().position(|t| t.key == p))
        .unwrap_or(0);
    let order = std::iter::once(base).chain((0..tables.len()).filter(|&i| i != base));

    let mut wide = WideTable::new();
    let mut index: HashMap<(String, i32), usize> = HashMap::new();

    for ti in order {
        let Some(table) = tables.get(ti) else { continue };
        let mut col = vec![None; wide.len()];
        for obs in &table.rows {
            let key = (obs.area.clone(), obs.year);
            let row = match index.get(&key) {
                Some(&r) => r,
                None => {
                    let r = wide.areas.len();
                    index.insert(key, r);
                    wide.areas.push(obs.area.clone());
                    wide.years.push(obs.year);
                    for (_, c) in &mut wide.columns {
                        c.push(None);
                    }
                    col.push(None);
                    r
                }
            };
            col[row] = obs.value;
        }
        wide.set_column(&table.key, col);
    }

    debug!(rows = wide.len(), columns = wide.columns.len(), "outer join done");
    wide
}
