use tracing::debug;

use super::raw_table::RawTable;
use super::utils::{clean_str, is_missing};

/// The storage type a column's non-missing cells agree on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Every non-missing cell parses as an integer.
    Integer,
    /// Every non-missing cell parses as a number, some with fractions.
    Float,
    /// At least one non-missing cell is not numeric.
    Text,
    /// No non-missing cells at all.
    Empty,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

fn infer_cell(raw: &str) -> ColumnKind {
    let v = clean_str(raw);
    if v.parse::<i64>().is_ok() {
        ColumnKind::Integer
    } else if v.parse::<f64>().is_ok() {
        ColumnKind::Float
    } else {
        ColumnKind::Text
    }
}

/// Infer a column's kind from all of its cells, ignoring missing markers.
/// Integers widen to Float when mixed with fractional values; any text cell
/// makes the column Text.
pub fn infer_kind<'a>(cells: impl IntoIterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Empty;
    for cell in cells {
        if is_missing(cell) {
            continue;
        }
        kind = match (kind, infer_cell(cell)) {
            (_, ColumnKind::Text) => return ColumnKind::Text,
            (ColumnKind::Empty, k) => k,
            (ColumnKind::Integer, ColumnKind::Integer) => ColumnKind::Integer,
            _ => ColumnKind::Float,
        };
    }
    kind
}

/// Kinds for every column of `table`, in header order.
pub fn column_kinds(table: &RawTable) -> Vec<ColumnKind> {
    (0..table.num_columns())
        .map(|i| {
            let kind = infer_kind(table.column(i));
            debug!(column = %table.headers[i], ?kind, "inferred column kind");
            kind
        })
        .collect()
}
