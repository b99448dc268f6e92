use std::fmt;
use tracing::debug;

use super::kinds::{column_kinds, ColumnKind};
use super::raw_table::RawTable;

/// Header names recognised as the entity (country/area) column.
pub const AREA_NAMES: &[&str] = &["area", "country", "country or area", "location", "geo"];
/// Header names recognised as the period column, besides anything containing "year".
pub const YEAR_NAMES: &[&str] = &["time", "period"];
/// Header names recognised as the observation column.
pub const VALUE_NAMES: &[&str] = &["total", "value", "observed_value", "obs_value"];

/// Positions of the three columns an indicator file must provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnRoles {
    pub area: usize,
    pub year: usize,
    pub value: usize,
}

/// Which roles could not be assigned; the file is skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnresolvedColumns {
    pub area: bool,
    pub year: bool,
    pub value: bool,
}

impl fmt::Display for UnresolvedColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<&str> = [
            (self.area, "Area"),
            (self.year, "Year"),
            (self.value, "Value"),
        ]
        .into_iter()
        .filter_map(|(m, n)| m.then_some(n))
        .collect();
        write!(f, "could not infer column(s) {}", missing.join("/"))
    }
}

impl std::error::Error for UnresolvedColumns {}

fn find_by_name(headers: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
    headers
        .iter()
        .position(|h| pred(h.trim().to_lowercase().as_str()))
}

/// Assign area/year/value columns by header name, then by column kind.
///
/// Name pass (case-insensitive): area and value must equal a known synonym;
/// year is any header containing "year" or equal to "time"/"period".
///
/// Kind pass, only for roles still open, in this order:
/// - year: first integer column not already taken
/// - value: first numeric column that is not the year column
/// - area: first text column not already taken
pub fn infer_columns(table: &RawTable) -> Result<ColumnRoles, UnresolvedColumns> {
    let headers = &table.headers;
    let mut area = find_by_name(headers, |h| AREA_NAMES.contains(&h));
    let mut year = find_by_name(headers, |h| h.contains("year") || YEAR_NAMES.contains(&h));
    let mut value = find_by_name(headers, |h| VALUE_NAMES.contains(&h));

    if area.is_none() || year.is_none() || value.is_none() {
        let kinds = column_kinds(table);
        let taken = |i: usize, roles: &[Option<usize>]| roles.iter().any(|r| *r == Some(i));

        if year.is_none() {
            year = (0..kinds.len())
                .find(|&i| kinds[i] == ColumnKind::Integer && !taken(i, &[area, value]));
        }
        if value.is_none() {
            value = (0..kinds.len())
                .find(|&i| kinds[i].is_numeric() && !taken(i, &[year, area]));
        }
        if area.is_none() {
            area = (0..kinds.len())
                .find(|&i| kinds[i] == ColumnKind::Text && !taken(i, &[year, value]));
        }
    }

    match (area, year, value) {
        (Some(area), Some(year), Some(value)) => {
            debug!(
                area = %headers[area],
                year = %headers[year],
                value = %headers[value],
                "inferred column roles"
            );
            Ok(ColumnRoles { area, year, value })
        }
        _ => Err(UnresolvedColumns {
            area: area.is_none(),
            year: year.is_none(),
            value: value.is_none(),
        }),
    }
}
