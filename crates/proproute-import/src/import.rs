use proproute_sheets::PropertyStore;
use serde::Serialize;

use crate::aliases::HeaderMap;
use crate::error::ImportError;
use crate::format::{read_rows, FileFormat};

/// Outcome of one bulk import. Row numbers are 1-based file rows, header
/// included, so they match what a spreadsheet program shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    /// Data rows seen (header and fully blank rows excluded).
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
    pub failed: Vec<FailedRow>,
}

/// A row rejected before any write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

/// A row whose append was attempted and failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRow {
    pub row: usize,
    pub property_id: String,
    pub reason: String,
}

/// Imports an uploaded file into `store`, one append per row, in file order.
///
/// The extension is checked before the bytes are parsed. Row-level problems
/// never abort the import; they are reported in the summary.
///
/// # Errors
///
/// Returns [`ImportError`] when the file as a whole cannot be used: wrong
/// extension, unparseable content, no rows, or a header row without a
/// property id column.
pub async fn import_bytes(
    store: &PropertyStore,
    file_name: &str,
    bytes: &[u8],
) -> Result<ImportSummary, ImportError> {
    let format = FileFormat::from_file_name(file_name)?;
    let rows = read_rows(format, bytes)?;
    let Some(first) = rows.first() else {
        return Err(ImportError::Empty);
    };

    let header = HeaderMap::resolve(first)?;
    let skip = usize::from(header.has_header());

    let mut summary = ImportSummary::default();
    for (idx, cells) in rows.iter().enumerate().skip(skip) {
        let row = idx + 1;
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        summary.total_rows += 1;

        let input = header.to_new_property(cells);
        if let Err(e) = input.validate() {
            summary.skipped.push(SkippedRow {
                row,
                reason: e.to_string(),
            });
            continue;
        }

        let property_id = input.property_id.clone();
        match store.append(input).await {
            Ok(_) => summary.imported += 1,
            Err(e) => {
                tracing::warn!(row, property_id = %property_id, error = %e, "import row append failed");
                summary.failed.push(FailedRow {
                    row,
                    property_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        file = file_name,
        total = summary.total_rows,
        imported = summary.imported,
        skipped = summary.skipped.len(),
        failed = summary.failed.len(),
        "bulk import finished"
    );
    Ok(summary)
}
