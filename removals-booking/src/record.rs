//! The in-progress booking record shared by every wizard step.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema version written with every record.
pub const RECORD_VERSION: u32 = 1;

const fn current_version() -> u32 {
    RECORD_VERSION
}

/// The two kinds of removal the wizard books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Residential,
    Business,
}

impl ServiceType {
    pub const ALL: [Self; 2] = [Self::Residential, Self::Business];

    /// Query-string / storage value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Business => "business",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Residential => "Residential Removals",
            Self::Business => "Business Removals",
        }
    }

    /// Parse a `type` query value. Matching is exact; anything else is absent.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    #[must_use]
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        value.and_then(Self::parse)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An add-on copied into the record when step 5 completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedAddOn {
    pub id: String,
    pub name: String,
    pub price: u32,
}

/// Fields a step must have written before later steps can be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    ServiceType,
    CollectionAddress,
    CollectionPostcode,
    DeliveryAddress,
    DeliveryPostcode,
    Date,
    Time,
    Vehicle,
    VehicleName,
    VehicleBasePrice,
    Hours,
    BasePrice,
    TotalHoursPrice,
    TotalPrice,
}

/// Which end of the move an address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Collection,
    Delivery,
}

/// Address fields of one endpoint as entered on step 2.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInput {
    pub address: String,
    pub postcode: String,
    pub place_id: Option<String>,
}

/// The single accumulating booking.
///
/// Serialized as camelCase JSON so the persisted layout reads
/// `{"serviceType":"residential","collectionAddress":...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_place_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_place_id: Option<String>,
    /// Route distance in miles, one decimal place. 0 until resolved.
    #[serde(default)]
    pub distance: f64,
    /// Route duration in whole minutes. 0 until resolved.
    #[serde(default)]
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_base_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hours_price: Option<u32>,
    #[serde(default)]
    pub additional_options: Vec<SelectedAddOn>,
    #[serde(default)]
    pub additional_options_price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Default for BookingRecord {
    fn default() -> Self {
        Self {
            version: RECORD_VERSION,
            service_type: None,
            collection_address: None,
            collection_postcode: None,
            collection_place_id: None,
            delivery_address: None,
            delivery_postcode: None,
            delivery_place_id: None,
            distance: 0.0,
            duration: 0,
            date: None,
            time: None,
            vehicle: None,
            vehicle_name: None,
            vehicle_base_price: None,
            hours: None,
            base_price: None,
            total_hours_price: None,
            additional_options: Vec::new(),
            additional_options_price: 0,
            total_price: None,
            reference: None,
        }
    }
}

fn filled(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl BookingRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_service(service_type: ServiceType) -> Self {
        Self {
            service_type: Some(service_type),
            ..Self::default()
        }
    }

    /// Whether this build understands the record's schema.
    #[must_use]
    pub const fn is_supported_version(&self) -> bool {
        self.version <= RECORD_VERSION
    }

    /// Report whether a step-owned field has been written.
    #[must_use]
    pub fn has(&self, field: RecordField) -> bool {
        match field {
            RecordField::ServiceType => self.service_type.is_some(),
            RecordField::CollectionAddress => filled(self.collection_address.as_ref()),
            RecordField::CollectionPostcode => filled(self.collection_postcode.as_ref()),
            RecordField::DeliveryAddress => filled(self.delivery_address.as_ref()),
            RecordField::DeliveryPostcode => filled(self.delivery_postcode.as_ref()),
            RecordField::Date => self.date.is_some(),
            RecordField::Time => filled(self.time.as_ref()),
            RecordField::Vehicle => filled(self.vehicle.as_ref()),
            RecordField::VehicleName => filled(self.vehicle_name.as_ref()),
            RecordField::VehicleBasePrice => self.vehicle_base_price.is_some_and(|p| p > 0),
            RecordField::Hours => self.hours.is_some_and(|h| h > 0),
            RecordField::BasePrice => self.base_price.is_some(),
            RecordField::TotalHoursPrice => self.total_hours_price.is_some(),
            RecordField::TotalPrice => self.total_price.is_some(),
        }
    }

    /// Current address fields for one endpoint.
    #[must_use]
    pub fn address(&self, endpoint: Endpoint) -> AddressInput {
        let (address, postcode, place_id) = match endpoint {
            Endpoint::Collection => (
                &self.collection_address,
                &self.collection_postcode,
                &self.collection_place_id,
            ),
            Endpoint::Delivery => (
                &self.delivery_address,
                &self.delivery_postcode,
                &self.delivery_place_id,
            ),
        };
        AddressInput {
            address: address.clone().unwrap_or_default(),
            postcode: postcode.clone().unwrap_or_default(),
            place_id: place_id.clone(),
        }
    }

    /// Overwrite one endpoint's address. A changed place id discards any
    /// route figures computed for the previous pair.
    pub fn set_address(&mut self, endpoint: Endpoint, input: AddressInput) {
        let place_id = input.place_id.filter(|id| !id.is_empty());
        let (address, postcode, slot) = match endpoint {
            Endpoint::Collection => (
                &mut self.collection_address,
                &mut self.collection_postcode,
                &mut self.collection_place_id,
            ),
            Endpoint::Delivery => (
                &mut self.delivery_address,
                &mut self.delivery_postcode,
                &mut self.delivery_place_id,
            ),
        };
        *address = Some(input.address);
        *postcode = Some(input.postcode);
        if *slot != place_id {
            *slot = place_id;
            self.distance = 0.0;
            self.duration = 0;
        }
    }

    /// Both place ids, when the geocoder resolved each endpoint.
    #[must_use]
    pub fn route_pair(&self) -> Option<(&str, &str)> {
        match (&self.collection_place_id, &self.delivery_place_id) {
            (Some(origin), Some(destination)) if !origin.is_empty() && !destination.is_empty() => {
                Some((origin.as_str(), destination.as_str()))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn has_route(&self) -> bool {
        self.route_pair().is_some() && self.distance > 0.0
    }

    /// Serialize to the persisted JSON layout.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or does not match the layout.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_type_parses_only_exact_values() {
        assert_eq!(ServiceType::parse("residential"), Some(ServiceType::Residential));
        assert_eq!(ServiceType::parse("business"), Some(ServiceType::Business));
        assert_eq!(ServiceType::parse("Business"), None);
        assert_eq!(ServiceType::from_query(None), None);
        assert_eq!(ServiceType::from_query(Some("")), None);
    }

    #[test]
    fn json_layout_uses_camel_case_keys() {
        let mut record = BookingRecord::with_service(ServiceType::Business);
        record.collection_address = Some("1 High Street".into());
        record.date = NaiveDate::from_ymd_opt(2030, 5, 1);
        let json = record.to_json().unwrap();
        assert!(json.contains("\"serviceType\":\"business\""));
        assert!(json.contains("\"collectionAddress\":\"1 High Street\""));
        assert!(json.contains("\"date\":\"2030-05-01\""));
        assert!(!json.contains("vehicleName"));
    }

    #[test]
    fn missing_keys_fill_with_defaults() {
        let record = BookingRecord::from_json(r#"{"serviceType":"residential"}"#).unwrap();
        assert_eq!(record.version, RECORD_VERSION);
        assert!(record.additional_options.is_empty());
        assert!(record.distance.abs() < f64::EPSILON);
        assert!(record.has(RecordField::ServiceType));
        assert!(!record.has(RecordField::Vehicle));
    }

    #[test]
    fn blank_strings_do_not_count_as_present() {
        let record = BookingRecord {
            collection_address: Some("   ".into()),
            ..BookingRecord::default()
        };
        assert!(!record.has(RecordField::CollectionAddress));
    }

    #[test]
    fn changing_place_id_resets_route_figures() {
        let mut record = BookingRecord::new();
        record.set_address(
            Endpoint::Collection,
            AddressInput {
                address: "A".into(),
                postcode: "AB1 2CD".into(),
                place_id: Some("origin".into()),
            },
        );
        record.set_address(
            Endpoint::Delivery,
            AddressInput {
                address: "B".into(),
                postcode: "EF3 4GH".into(),
                place_id: Some("dest".into()),
            },
        );
        record.distance = 12.5;
        record.duration = 30;
        assert!(record.has_route());

        // Same place id, edited text: figures survive.
        record.set_address(
            Endpoint::Delivery,
            AddressInput {
                address: "B, Flat 2".into(),
                postcode: "EF3 4GH".into(),
                place_id: Some("dest".into()),
            },
        );
        assert_eq!(record.duration, 30);

        record.set_address(
            Endpoint::Delivery,
            AddressInput {
                address: "C".into(),
                postcode: "IJ5 6KL".into(),
                place_id: None,
            },
        );
        assert_eq!(record.duration, 0);
        assert!(record.route_pair().is_none());
    }

    #[test]
    fn future_versions_are_flagged() {
        let record = BookingRecord {
            version: RECORD_VERSION + 1,
            ..BookingRecord::default()
        };
        assert!(!record.is_supported_version());
    }
}
