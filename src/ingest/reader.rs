use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;
use std::{fs, io::Cursor, path::Path};
use tracing::{debug, instrument};

use super::raw_table::RawTable;
use super::utils::clean_str;

/// Spreadsheet extensions that are recognised but cannot be decoded.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "ods"];

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Decode file bytes as UTF-8, falling back to Latin-1 when that fails.
/// A leading byte-order mark is dropped.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            debug!("input is not valid UTF-8, decoding as Latin-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    };
    text.strip_prefix('\u{feff}')
        .map(str::to_string)
        .unwrap_or(text)
}

/// Pick a field delimiter: `.tsv`/`.tab` files are tab-separated, anything
/// else is sniffed from the header line (comma wins ties).
pub fn sniff_delimiter(path: &Path, text: &str) -> u8 {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if matches!(ext.as_deref(), Some("tsv") | Some("tab")) {
        return b'\t';
    }

    let header = text.lines().next().unwrap_or("");
    [b',', b';', b'\t']
        .into_iter()
        .map(|d| (d, header.bytes().filter(|&b| b == d).count()))
        .fold((b',', 0), |best, cand| if cand.1 > best.1 { cand } else { best })
        .0
}

/// Read a delimited text file into a `RawTable`.
///
/// The first record is the header row. Records are read flexibly so short
/// or long rows do not abort the file; blank records are skipped.
#[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_delimited<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    if is_spreadsheet(path) {
        bail!("spreadsheet files are not supported: {:?}", path);
    }
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let text = decode_text(&bytes);
    let delimiter = sniff_delimiter(path, &text);

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("CSV parse error in {:?} at record {}", path, idx))?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        match headers {
            None => headers = Some(record.iter().map(clean_str).collect()),
            Some(_) => rows.push(record.iter().map(str::to_string).collect()),
        }
    }

    let headers = headers.ok_or_else(|| anyhow!("{:?} has no header row", path))?;
    debug!(columns = headers.len(), rows = rows.len(), "read delimited file");
    Ok(RawTable::new(headers, rows))
}
