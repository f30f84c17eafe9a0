use std::path::Path;

use anyhow::Context;
use proproute_import::{import_bytes, FileFormat, ImportSummary};
use proproute_sheets::PropertyStore;

/// Import a file into the catalog sheet and print the summary.
///
/// # Errors
///
/// Returns an error if the extension is unsupported, the file cannot be
/// read, or its contents cannot be parsed. Row failures are reported in
/// the summary instead.
pub(crate) async fn run_import(store: &PropertyStore, file: &Path) -> anyhow::Result<()> {
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    FileFormat::from_file_name(&file_name)?;

    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let summary = import_bytes(store, &file_name, &bytes).await?;

    print!("{}", render_summary(&file_name, &summary));
    Ok(())
}

fn render_summary(file_name: &str, summary: &ImportSummary) -> String {
    let mut out = format!(
        "{file_name}: {} of {} rows imported\n",
        summary.imported, summary.total_rows
    );
    for skipped in &summary.skipped {
        out.push_str(&format!("  skipped row {}: {}\n", skipped.row, skipped.reason));
    }
    for failed in &summary.failed {
        out.push_str(&format!(
            "  failed row {} ({}): {}\n",
            failed.row, failed.property_id, failed.reason
        ));
    }
    out
}
