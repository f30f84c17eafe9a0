//! Property records as stored in the catalog spreadsheet.
//!
//! Serialized field names follow the wire format the route-planning UI
//! already consumes (`propertyId`, `landlordName`, `coordinates`, ...).

use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub const ZERO: Position = Position { lat: 0.0, lng: 0.0 };

    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Parses a `"lat,lng"` cell.
    ///
    /// Returns `None` unless the input is exactly two comma-separated values
    /// that both parse to finite floats.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Position> {
        let mut parts = raw.split(',');
        let lat = parts.next()?.trim().parse::<f64>().ok()?;
        let lng = parts.next()?.trim().parse::<f64>().ok()?;
        if parts.next().is_some() || !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        Some(Position { lat, lng })
    }

    /// Like [`Position::parse`], but malformed input yields [`Position::ZERO`].
    #[must_use]
    pub fn parse_or_zero(raw: &str) -> Position {
        Self::parse(raw).unwrap_or(Self::ZERO)
    }

    /// A zero-filled position stands for "unknown" in the catalog.
    #[must_use]
    pub fn is_known(&self) -> bool {
        *self != Self::ZERO
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyCategory {
    Factory,
    Warehouse,
    Both,
}

impl PropertyCategory {
    /// Anything other than an exact `factory` or `warehouse` is treated as `both`.
    #[must_use]
    pub fn from_cell(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "factory" => PropertyCategory::Factory,
            "warehouse" => PropertyCategory::Warehouse,
            _ => PropertyCategory::Both,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyCategory::Factory => "factory",
            PropertyCategory::Warehouse => "warehouse",
            PropertyCategory::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Rent,
    Sale,
}

impl ListingKind {
    /// Anything other than `rent` is treated as `sale`.
    #[must_use]
    pub fn from_cell(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("rent") {
            ListingKind::Rent
        } else {
            ListingKind::Sale
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ListingKind::Rent => "rent",
            ListingKind::Sale => "sale",
        }
    }
}

/// One industrial property listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// Store-issued row identifier (column A). Absent on legacy rows.
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<String>,
    #[serde(rename = "propertyId")]
    pub property_id: String,
    #[serde(rename = "landlordName")]
    pub owner_name: String,
    #[serde(rename = "landlordContact")]
    pub owner_contact: String,
    #[serde(rename = "buildingSize")]
    pub floor_area_sqm: f64,
    #[serde(rename = "type")]
    pub category: PropertyCategory,
    #[serde(rename = "rentOrSale")]
    pub listing_kind: ListingKind,
    /// Free text, currency and formatting are not interpreted.
    pub price: String,
    #[serde(rename = "subDistrict")]
    pub sub_district: String,
    pub district: String,
    pub province: String,
    #[serde(rename = "mapUrl")]
    pub map_url: String,
    #[serde(rename = "coordinates")]
    pub position: Position,
    #[serde(rename = "websiteLink")]
    pub listing_url: String,
}

/// A property submitted through the entry form or a bulk-import row.
///
/// Every field arrives as text; numeric and positional fields are parsed
/// leniently by [`NewProperty::into_record`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProperty {
    #[serde(deserialize_with = "text_or_number")]
    pub property_id: String,
    pub landlord_name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub landlord_contact: String,
    #[serde(deserialize_with = "text_or_number")]
    pub building_size: String,
    #[serde(rename = "type")]
    pub category: String,
    pub rent_or_sale: String,
    #[serde(deserialize_with = "text_or_number")]
    pub price: String,
    pub sub_district: String,
    pub district: String,
    pub province: String,
    pub map_url: String,
    /// `"lat,lng"`.
    pub coordinates: String,
    pub website_link: String,
}

impl NewProperty {
    /// Checks the fields a record cannot exist without.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingField`] naming the first blank required field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.property_id.trim().is_empty() {
            return Err(CoreError::MissingField("propertyId"));
        }
        if self.landlord_name.trim().is_empty() {
            return Err(CoreError::MissingField("landlordName"));
        }
        Ok(())
    }

    #[must_use]
    pub fn into_record(self, row_id: Option<String>) -> PropertyRecord {
        PropertyRecord {
            row_id,
            property_id: self.property_id.trim().to_string(),
            owner_name: self.landlord_name.trim().to_string(),
            owner_contact: self.landlord_contact.trim().to_string(),
            floor_area_sqm: parse_area(&self.building_size),
            category: PropertyCategory::from_cell(&self.category),
            listing_kind: ListingKind::from_cell(&self.rent_or_sale),
            price: self.price.trim().to_string(),
            sub_district: self.sub_district.trim().to_string(),
            district: self.district.trim().to_string(),
            province: self.province.trim().to_string(),
            map_url: self.map_url.trim().to_string(),
            position: Position::parse_or_zero(&self.coordinates),
            listing_url: self.website_link.trim().to_string(),
        }
    }
}

/// Floor area cells sometimes carry thousands separators; unparseable is 0.
#[must_use]
pub fn parse_area(raw: &str) -> f64 {
    raw.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Int(i64),
        Float(f64),
        Empty(()),
    }

    Ok(match Cell::deserialize(deserializer)? {
        Cell::Text(s) => s,
        Cell::Int(n) => n.to_string(),
        Cell::Float(n) => n.to_string(),
        Cell::Empty(()) => String::new(),
    })
}
