//! File-type gate and row extraction for uploaded files.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader};

use crate::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Picks the format from the file extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::UnsupportedExtension`] for anything other than
    /// `.csv`, `.xlsx` or `.xls`.
    pub fn from_file_name(name: &str) -> Result<Self, ImportError> {
        let ext = Path::new(name.trim())
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            _ => Err(ImportError::UnsupportedExtension(name.to_string())),
        }
    }
}

/// Reads every row of the file (or of the first worksheet) as text cells.
///
/// # Errors
///
/// Returns [`ImportError::Csv`] or [`ImportError::Workbook`] when the bytes
/// do not parse as the given format, and [`ImportError::NoWorksheet`] for a
/// workbook without sheets.
pub fn read_rows(format: FileFormat, bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    match format {
        FileFormat::Csv => read_csv(bytes),
        FileFormat::Xlsx | FileFormat::Xls => read_workbook(bytes),
    }
}

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)??;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// Flattens a workbook cell. Whole floats lose their `.0` so identifiers and
/// phone numbers typed as numbers come through unchanged.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        other => other.to_string(),
    }
}
