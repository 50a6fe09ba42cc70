//! Newline-delimited JSON export of dataset records.

use crate::error::ExportError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, instrument};

/// Writes one JSON object per line to `writer`. Returns the number of records.
pub fn write_records<T, W>(records: &[T], mut writer: W) -> Result<usize, ExportError>
where
    T: Serialize,
    W: Write,
{
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Writes records to `path` as newline-delimited JSON, replacing the file.
#[instrument(skip_all, fields(path = %path.as_ref().display(), records = records.len()))]
pub fn write_results<T: Serialize>(
    records: &[T],
    path: impl AsRef<Path>,
) -> Result<usize, ExportError> {
    let file = File::create(path.as_ref())?;
    let written = write_records(records, BufWriter::new(file))?;
    info!("Exported {} records", written);
    Ok(written)
}
