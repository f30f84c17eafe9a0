//! Header-name aliases for uploaded files.
//!
//! Each field has an ordered list of accepted header names. Headers are
//! compared after lowercasing and dropping everything that is not a letter
//! or digit, so `"Property ID (ATS)"`, `propertyId` and `property_id` all
//! normalize to a known key.

use proproute_core::NewProperty;

use crate::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PropertyId,
    LandlordName,
    LandlordContact,
    BuildingSize,
    Category,
    RentOrSale,
    Price,
    SubDistrict,
    District,
    Province,
    MapUrl,
    Coordinates,
    WebsiteLink,
}

impl Field {
    /// Documented column order for files without a header row.
    pub const ORDER: [Field; 13] = [
        Field::PropertyId,
        Field::LandlordName,
        Field::LandlordContact,
        Field::BuildingSize,
        Field::Category,
        Field::RentOrSale,
        Field::Price,
        Field::SubDistrict,
        Field::District,
        Field::Province,
        Field::MapUrl,
        Field::Coordinates,
        Field::WebsiteLink,
    ];

    /// Accepted header names, most specific first.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::PropertyId => &["propertyidats", "propertyid", "ats", "id"],
            Field::LandlordName => &[
                "landlordnameorcompanyname",
                "landlordname",
                "companyname",
                "ownername",
                "owner",
                "landlord",
            ],
            Field::LandlordContact => &["landlordcontact", "ownercontact", "contact", "phone"],
            Field::BuildingSize => &[
                "buildingsizeinsqm",
                "buildingsize",
                "sizesqm",
                "size",
                "area",
                "sqm",
            ],
            Field::Category => &["factoryorwarehouse", "propertytype", "type", "category"],
            Field::RentOrSale => &["rentorsale", "listingtype", "rentsale", "listing"],
            Field::Price => &["price"],
            Field::SubDistrict => &["subdistrict", "tambon"],
            Field::District => &["district", "amphoe"],
            Field::Province => &["province"],
            Field::MapUrl => &["mapurl", "maplink", "googlemap", "map"],
            Field::Coordinates => &[
                "latitudelongitude",
                "leftrightcoordinates",
                "coordinates",
                "latlng",
                "location",
            ],
            Field::WebsiteLink => &["websitelink", "website", "listingurl", "link", "url"],
        }
    }

    fn name(self) -> &'static str {
        match self {
            Field::PropertyId => "propertyId",
            Field::LandlordName => "landlordName",
            Field::LandlordContact => "landlordContact",
            Field::BuildingSize => "buildingSize",
            Field::Category => "type",
            Field::RentOrSale => "rentOrSale",
            Field::Price => "price",
            Field::SubDistrict => "subDistrict",
            Field::District => "district",
            Field::Province => "province",
            Field::MapUrl => "mapUrl",
            Field::Coordinates => "coordinates",
            Field::WebsiteLink => "websiteLink",
        }
    }

    fn assign(self, target: &mut NewProperty, value: String) {
        let slot = match self {
            Field::PropertyId => &mut target.property_id,
            Field::LandlordName => &mut target.landlord_name,
            Field::LandlordContact => &mut target.landlord_contact,
            Field::BuildingSize => &mut target.building_size,
            Field::Category => &mut target.category,
            Field::RentOrSale => &mut target.rent_or_sale,
            Field::Price => &mut target.price,
            Field::SubDistrict => &mut target.sub_district,
            Field::District => &mut target.district,
            Field::Province => &mut target.province,
            Field::MapUrl => &mut target.map_url,
            Field::Coordinates => &mut target.coordinates,
            Field::WebsiteLink => &mut target.website_link,
        };
        *slot = value;
    }
}

fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Column index per field, resolved once per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    columns: Vec<(Field, usize)>,
    /// Whether the first row was consumed as a header.
    has_header: bool,
}

impl HeaderMap {
    /// Resolves `first_row` against the alias table.
    ///
    /// Fields are resolved in [`Field::ORDER`]; for each, aliases are tried
    /// in order and the first still-unclaimed column that matches wins. If no
    /// cell matches any alias, the row is treated as data and columns follow
    /// the documented order.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::MissingColumn`] when the header row matched
    /// some fields but not the property id.
    pub fn resolve(first_row: &[String]) -> Result<Self, ImportError> {
        let normalized: Vec<String> = first_row.iter().map(|c| normalize_header(c)).collect();
        let mut claimed = vec![false; normalized.len()];
        let mut columns = Vec::new();

        for field in Field::ORDER {
            let hit = field.aliases().iter().find_map(|alias| {
                normalized
                    .iter()
                    .enumerate()
                    .find(|(idx, header)| !claimed[*idx] && header.as_str() == *alias)
                    .map(|(idx, _)| idx)
            });
            if let Some(idx) = hit {
                claimed[idx] = true;
                columns.push((field, idx));
            }
        }

        if columns.is_empty() {
            tracing::debug!("no recognised header cells; using documented column order");
            return Ok(Self::positional());
        }
        if !columns.iter().any(|(f, _)| *f == Field::PropertyId) {
            return Err(ImportError::MissingColumn(Field::PropertyId.name()));
        }
        Ok(Self {
            columns,
            has_header: true,
        })
    }

    #[must_use]
    pub fn positional() -> Self {
        Self {
            columns: Field::ORDER.iter().copied().zip(0..).collect(),
            has_header: false,
        }
    }

    #[must_use]
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    #[must_use]
    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
    }

    /// Builds form input from one data row; unmapped fields stay blank.
    #[must_use]
    pub fn to_new_property(&self, row: &[String]) -> NewProperty {
        let mut input = NewProperty::default();
        for (field, idx) in &self.columns {
            if let Some(cell) = row.get(*idx) {
                field.assign(&mut input, cell.trim().to_string());
            }
        }
        input
    }
}
