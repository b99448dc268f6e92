// src/export.rs

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{fs, fs::File, path::Path, sync::Arc};
use tracing::{info, instrument};

use crate::merge::WideTable;

/// Arrow schema for a finished table: Area, Year, then one nullable Float64
/// per column.
pub fn schema_for(table: &WideTable) -> Schema {
    let mut fields = vec![
        Field::new("Area", DataType::Utf8, false),
        Field::new("Year", DataType::Int32, false),
    ];
    fields.extend(table.column_names().map(|n| Field::new(n, DataType::Float64, true)));
    Schema::new(fields)
}

pub fn to_record_batch(table: &WideTable) -> Result<RecordBatch> {
    let schema = Arc::new(schema_for(table));
    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(table.areas())),
        Arc::new(Int32Array::from(table.years().to_vec())),
    ];
    for name in table.column_names() {
        let col = table.column_or_missing(name);
        arrays.push(Arc::new(Float64Array::from(col)));
    }
    RecordBatch::try_new(schema, arrays).context("building record batch")
}

/// Write `table` as a single Snappy-compressed Parquet file.
///
/// Data goes to `<path>.tmp` first and is renamed into place once the
/// writer has closed.
#[instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display(), rows = table.len()))]
pub fn write_parquet<P: AsRef<Path>>(table: &WideTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let batch = to_record_batch(table)?;
    let tmp_path = path.with_extension("parquet.tmp");

    let file = File::create(&tmp_path).with_context(|| format!("creating {:?}", &tmp_path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {:?} to {:?}", &tmp_path, path))?;
    info!(rows = batch.num_rows(), "wrote parquet");
    Ok(())
}
