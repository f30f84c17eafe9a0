use proproute_core::PropertyRecord;
use proproute_sheets::PropertyStore;

/// Print the catalog as a table.
///
/// # Errors
///
/// Returns an error if the sheet cannot be read. Unlike the HTTP listing,
/// an operator asking for the catalog wants to see the failure.
pub(crate) async fn run_properties(store: &PropertyStore) -> anyhow::Result<()> {
    let records = store.try_fetch_all().await?;
    if records.is_empty() {
        println!("no properties found in the catalog sheet");
        return Ok(());
    }
    for line in property_table(&records) {
        println!("{line}");
    }
    Ok(())
}

fn property_table(records: &[PropertyRecord]) -> Vec<String> {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(format!(
        "{:<12}{:<24}{:<11}{:<6}{:>10}  {:<20}LOCATION",
        "ID", "OWNER", "TYPE", "DEAL", "SQM", "DISTRICT"
    ));
    for p in records {
        let location = if p.position.is_known() {
            p.position.to_string()
        } else {
            "-".to_string()
        };
        lines.push(format!(
            "{:<12}{:<24}{:<11}{:<6}{:>10}  {:<20}{}",
            p.property_id,
            truncate(&p.owner_name, 22),
            p.category.as_str(),
            p.listing_kind.as_str(),
            p.floor_area_sqm,
            truncate(&p.district, 18),
            location
        ));
    }
    lines
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text.to_string()
    }
}
