//! Vehicles, add-ons and time slots offered by the wizard.
use serde::{Deserialize, Serialize};

use crate::record::SelectedAddOn;

/// A van that can be hired by the hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub description: String,
    pub capacity: String,
    pub max_weight: String,
    #[serde(default)]
    pub image: String,
    /// Hourly rate in whole pounds.
    pub base_price: u32,
}

/// A flat-priced optional extra selectable on step 5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u32,
}

impl AddOn {
    #[must_use]
    pub fn to_selected(&self) -> SelectedAddOn {
        SelectedAddOn {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
        }
    }
}

/// A bookable start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl Catalog {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            vehicles: Vec::new(),
            add_ons: Vec::new(),
            time_slots: Vec::new(),
        }
    }

    /// Load catalog from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into catalog data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded data is malformed.
    pub fn load_from_static() -> Result<Self, serde_json::Error> {
        Self::from_json(include_str!("../data/catalog.json"))
    }

    #[must_use]
    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    #[must_use]
    pub fn add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn has_time_slot(&self, value: &str) -> bool {
        self.time_slots.iter().any(|slot| slot.value == value)
    }
}
