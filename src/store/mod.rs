//! CSV persistence for [`RecordTable`]s: bulk save to and bulk load from a named file.

use crate::table::{RecordTable, Value};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    collections::HashSet,
    fs::File,
    io::{self, Read, Write},
    path::Path,
};
use tracing::{debug, info, warn};

/// Result of a load that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(RecordTable),
    /// The file does not exist. Non-fatal; callers substitute an empty table.
    NotFound,
}

impl LoadOutcome {
    /// The loaded table, or an empty one when the file was missing.
    pub fn into_table(self) -> RecordTable {
        match self {
            LoadOutcome::Loaded(t) => t,
            LoadOutcome::NotFound => RecordTable::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadOutcome::NotFound)
    }
}

/// Write `table` to `path` as CSV, overwriting any existing file.
///
/// A header row is always written when the table has columns; a table
/// without columns produces an empty file.
#[tracing::instrument(level = "debug", skip(table, path), fields(path = %path.as_ref().display(), rows = table.row_count()))]
pub fn save<P: AsRef<Path>>(table: &RecordTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_table(table, file).with_context(|| format!("writing CSV to {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.columns().len(),
        "saved table"
    );
    Ok(())
}

/// Read `path` as CSV. A missing file is [`LoadOutcome::NotFound`]; any other
/// problem (permissions, malformed CSV, invalid UTF-8) is an error.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn load<P: AsRef<Path>>(path: P) -> Result<LoadOutcome> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no saved data");
            return Ok(LoadOutcome::NotFound);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("opening {}", path.display()));
        }
    };
    let table = read_table(file).with_context(|| format!("reading CSV from {}", path.display()))?;
    info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.columns().len(),
        "loaded table"
    );
    Ok(LoadOutcome::Loaded(table))
}

/// The exact text [`save`] would write, for handing to a download action.
pub fn to_csv_string(table: &RecordTable) -> Result<String> {
    let mut buf = Vec::new();
    write_table(table, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

/// Serialize `table` into any writer.
pub fn write_table<W: Write>(table: &RecordTable, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    if !table.columns().is_empty() {
        wtr.write_record(table.columns())
            .context("writing header row")?;
        for (idx, row) in table.rows().iter().enumerate() {
            wtr.write_record(row.iter().map(Value::to_string))
                .with_context(|| format!("writing row {}", idx))?;
        }
    }
    wtr.flush().context("flushing CSV writer")?;
    Ok(())
}

/// Parse CSV text from any reader: header row, then data rows with inferred cell types.
pub fn read_table<R: Read>(reader: R) -> Result<RecordTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short or long rows are tolerated and fixed up below
        .from_reader(reader);

    let raw_headers: Vec<String> = rdr
        .headers()
        .context("reading header row")?
        .iter()
        .map(str::to_string)
        .collect();
    let columns = dedupe_headers(raw_headers);
    let width = columns.len();

    let mut rows = Vec::new();
    let mut truncated = 0usize;
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx + 1))?;
        if record.len() > width {
            truncated += 1;
        }
        let mut row: Vec<Value> = record.iter().take(width).map(Value::infer).collect();
        row.resize(width, Value::Null);
        rows.push(row);
    }
    if truncated > 0 {
        warn!(
            rows = truncated,
            columns = width,
            "some rows have more cells than headers; extra cells dropped"
        );
    }

    Ok(RecordTable::from_parts(columns, rows))
}

/// Disambiguate repeated header names as `name.1`, `name.2`, ...
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());
    for name in headers {
        let mut candidate = name.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", name, n);
            n += 1;
        }
        if candidate != name {
            debug!(header = %name, renamed = %candidate, "duplicate header renamed");
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
