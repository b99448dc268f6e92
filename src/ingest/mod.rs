// src/ingest/mod.rs
pub mod clean;
pub mod columns;
pub mod kinds;
pub mod raw_table;
pub mod reader;
pub mod utils;

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, instrument};

pub use clean::{DuplicatePolicy, IndicatorTable, Observation};
pub use columns::{infer_columns, ColumnRoles, UnresolvedColumns};
pub use raw_table::RawTable;
pub use reader::read_delimited;

/// Read one resolved file and turn it into a cleaned `IndicatorTable`.
///
/// Every failure here (unreadable, empty, columns not inferable, rejected
/// duplicates) means the file contributes nothing; callers report the error
/// as a warning and carry on.
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_indicator<P: AsRef<Path>>(
    path: P,
    key: &str,
    policy: DuplicatePolicy,
) -> Result<IndicatorTable> {
    let path = path.as_ref();
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let raw = read_delimited(path).context("could not read file")?;
    if raw.is_empty() {
        bail!("file was empty or couldn't be parsed");
    }

    let roles = infer_columns(&raw)?;
    let rows = clean::clean_rows(&raw, roles);
    let rows = clean::apply_duplicate_policy(rows, policy)?;
    debug!(key, rows = rows.len(), "cleaned indicator table");

    Ok(IndicatorTable {
        key: key.to_string(),
        source,
        rows,
    })
}
