//! Property store backed by the catalog spreadsheet.

use proproute_core::{NewProperty, PropertyCatalog, PropertyRecord};
use uuid::Uuid;

use crate::client::SheetsClient;
use crate::error::SheetsError;
use crate::normalize::{record_to_row, row_to_record};

/// A record as written, with the identifier the store issued for its row.
#[derive(Debug, Clone)]
pub struct StoredProperty {
    pub row_id: String,
    pub record: PropertyRecord,
}

/// Reads and appends property records. Nothing is cached: every read
/// re-fetches the whole sheet.
pub struct PropertyStore {
    client: SheetsClient,
}

impl PropertyStore {
    #[must_use]
    pub fn new(client: SheetsClient) -> Self {
        Self { client }
    }

    /// Fetches and normalizes every row, dropping rows without a property id.
    ///
    /// # Errors
    ///
    /// Propagates any [`SheetsError`] from the read.
    pub async fn try_fetch_all(&self) -> Result<Vec<PropertyRecord>, SheetsError> {
        let rows = self.client.fetch_rows().await?;
        let total = rows.len();
        let records: Vec<PropertyRecord> = rows.iter().filter_map(|r| row_to_record(r)).collect();

        let dropped = total - records.len();
        if dropped > 0 {
            tracing::debug!(dropped, total, "skipped sheet rows without a property id");
        }
        Ok(records)
    }

    /// Like [`PropertyStore::try_fetch_all`], but a failed read yields an
    /// empty list. Callers treat empty as "no data available right now".
    pub async fn fetch_all(&self) -> Vec<PropertyRecord> {
        match self.try_fetch_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "property sheet read failed; serving empty catalog");
                Vec::new()
            }
        }
    }

    pub async fn load_catalog(&self) -> PropertyCatalog {
        PropertyCatalog::from_records(self.fetch_all().await)
    }

    /// Validates `input`, issues a fresh row identifier and appends the row.
    ///
    /// The identifier is a random UUID rather than a row count, so concurrent
    /// writers cannot collide on it.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::Invalid`] if a required field is blank.
    /// - Any [`SheetsError`] from the append call.
    pub async fn append(&self, input: NewProperty) -> Result<StoredProperty, SheetsError> {
        input.validate()?;

        let row_id = Uuid::new_v4().to_string();
        let record = input.into_record(Some(row_id.clone()));
        let row = record_to_row(&record);

        let response = self.client.append_row(&row).await?;
        tracing::info!(
            property_id = %record.property_id,
            row_id = %row_id,
            updated_range = response
                .updates
                .as_ref()
                .and_then(|u| u.updated_range.as_deref())
                .unwrap_or("unknown"),
            "appended property row"
        );

        Ok(StoredProperty { row_id, record })
    }
}
