//! Conversion between sheet rows and [`PropertyRecord`]s.
//!
//! The sheet has a fixed column layout, A through N:
//! row id, property id, owner, contact, floor area, category, listing kind,
//! price, sub-district, district, province, map URL, `"lat,lng"`, listing URL.

use proproute_core::property::parse_area;
use proproute_core::{ListingKind, Position, PropertyCategory, PropertyRecord};

pub const COLUMN_COUNT: usize = 14;

/// Normalizes one sheet row.
///
/// Returns `None` when the row has no property id; every other malformed
/// cell is defaulted (blank text, zero area, zero position).
#[must_use]
pub fn row_to_record(row: &[String]) -> Option<PropertyRecord> {
    let cell = |idx: usize| row.get(idx).map_or("", |s| s.trim());

    let property_id = cell(1);
    if property_id.is_empty() {
        return None;
    }

    let row_id = Some(cell(0).to_string()).filter(|s| !s.is_empty());

    Some(PropertyRecord {
        row_id,
        property_id: property_id.to_string(),
        owner_name: cell(2).to_string(),
        owner_contact: cell(3).to_string(),
        floor_area_sqm: parse_area(cell(4)),
        category: PropertyCategory::from_cell(cell(5)),
        listing_kind: ListingKind::from_cell(cell(6)),
        price: cell(7).to_string(),
        sub_district: cell(8).to_string(),
        district: cell(9).to_string(),
        province: cell(10).to_string(),
        map_url: cell(11).to_string(),
        position: Position::parse_or_zero(cell(12)),
        listing_url: cell(13).to_string(),
    })
}

/// Lays a record out in sheet column order.
#[must_use]
pub fn record_to_row(record: &PropertyRecord) -> Vec<String> {
    let position = if record.position.is_known() {
        record.position.to_string()
    } else {
        String::new()
    };

    vec![
        record.row_id.clone().unwrap_or_default(),
        record.property_id.clone(),
        record.owner_name.clone(),
        record.owner_contact.clone(),
        record.floor_area_sqm.to_string(),
        record.category.as_str().to_string(),
        record.listing_kind.as_str().to_string(),
        record.price.clone(),
        record.sub_district.clone(),
        record.district.clone(),
        record.province.clone(),
        record.map_url.clone(),
        position,
        record.listing_url.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| (*s).to_string()).collect()
    }

    fn full_row() -> Vec<String> {
        row(&[
            "7",
            "ATS-101",
            "Somchai",
            "0812345678",
            "2500",
            "warehouse",
            "rent",
            "150 THB/sqm",
            "Khlong Nueng",
            "Khlong Luang",
            "Pathum Thani",
            "https://maps.example/101",
            "14.0805, 100.6143",
            "https://listing.example/101",
        ])
    }

    #[test]
    fn row_to_record_maps_fixed_columns() {
        let record = row_to_record(&full_row()).expect("record");
        assert_eq!(record.row_id.as_deref(), Some("7"));
        assert_eq!(record.property_id, "ATS-101");
        assert_eq!(record.owner_name, "Somchai");
        assert_eq!(record.owner_contact, "0812345678");
        assert!((record.floor_area_sqm - 2500.0).abs() < f64::EPSILON);
        assert_eq!(record.category, PropertyCategory::Warehouse);
        assert_eq!(record.listing_kind, ListingKind::Rent);
        assert_eq!(record.price, "150 THB/sqm");
        assert_eq!(record.province, "Pathum Thani");
        assert_eq!(record.position, Position::new(14.0805, 100.6143));
        assert_eq!(record.listing_url, "https://listing.example/101");
    }

    #[test]
    fn short_rows_default_missing_cells() {
        let record = row_to_record(&row(&["", "ATS-102", "Malee"])).expect("record");
        assert!(record.row_id.is_none());
        assert_eq!(record.owner_contact, "");
        assert!(record.floor_area_sqm.abs() < f64::EPSILON);
        assert_eq!(record.category, PropertyCategory::Both);
        assert_eq!(record.listing_kind, ListingKind::Sale);
        assert_eq!(record.position, Position::ZERO);
    }

    #[test]
    fn malformed_position_zero_fills_instead_of_dropping() {
        let mut cells = full_row();
        cells[12] = "somewhere near Rangsit".to_string();
        let record = row_to_record(&cells).expect("record kept");
        assert_eq!(record.position, Position::ZERO);
    }

    #[test]
    fn row_without_property_id_is_dropped() {
        assert!(row_to_record(&row(&["1", "  ", "Owner"])).is_none());
        assert!(row_to_record(&[]).is_none());
    }

    #[test]
    fn record_to_row_restores_column_layout() {
        let record = row_to_record(&full_row()).expect("record");
        let cells = record_to_row(&record);
        assert_eq!(cells.len(), COLUMN_COUNT);
        assert_eq!(cells[1], "ATS-101");
        assert_eq!(cells[4], "2500");
        assert_eq!(cells[5], "warehouse");
        assert_eq!(cells[12], "14.0805,100.6143");
        assert_eq!(row_to_record(&cells), Some(record));
    }

    #[test]
    fn record_to_row_leaves_unknown_position_blank() {
        let record = row_to_record(&row(&["", "ATS-103"])).expect("record");
        assert_eq!(record_to_row(&record)[12], "");
    }
}
