use std::collections::HashSet;

use serde::Serialize;

use crate::property::{Position, PropertyRecord};

/// The property records loaded for one request or session.
///
/// Built fresh from every store read; identifiers are unique within a
/// snapshot (the first row carrying an identifier wins).
#[derive(Debug, Clone, Default)]
pub struct PropertyCatalog {
    records: Vec<PropertyRecord>,
}

/// A select-box entry for picking properties to visit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOption {
    pub value: String,
    pub label: String,
    pub coordinates: Position,
}

impl PropertyCatalog {
    #[must_use]
    pub fn from_records(records: Vec<PropertyRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.property_id.clone()) {
                unique.push(record);
            } else {
                tracing::warn!(
                    property_id = %record.property_id,
                    "duplicate property id in catalog snapshot; keeping first row"
                );
            }
        }
        Self { records: unique }
    }

    #[must_use]
    pub fn find(&self, property_id: &str) -> Option<&PropertyRecord> {
        self.records.iter().find(|r| r.property_id == property_id)
    }

    #[must_use]
    pub fn contains(&self, property_id: &str) -> bool {
        self.find(property_id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn records(&self) -> &[PropertyRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<PropertyRecord> {
        self.records
    }

    #[must_use]
    pub fn options(&self) -> Vec<RouteOption> {
        self.records
            .iter()
            .map(|p| RouteOption {
                value: p.property_id.clone(),
                label: format!(
                    "{} - {}, {} , {} sqm , {}  , {}",
                    p.property_id,
                    p.sub_district,
                    p.district,
                    p.floor_area_sqm,
                    p.position.lat,
                    p.position.lng
                ),
                coordinates: p.position,
            })
            .collect()
    }
}
