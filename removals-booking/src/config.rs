//! Wizard tunables and the mapping-service capability probe.
use serde::{Deserialize, Serialize};

use crate::pricing::{MAX_HOURS, MIN_HOURS};

const WIZARD_DATA: &str = include_str!("../data/wizard.json");

/// Key value shipped in sample environment files.
pub const SAMPLE_MAPS_KEY: &str = "your_google_maps_api_key_here";

const fn default_min_hours() -> u32 {
    2
}
const fn default_max_hours() -> u32 {
    12
}
const fn default_submit_latency_ms() -> u32 {
    2000
}
fn default_reference_prefix() -> String {
    "UK".to_string()
}
fn default_country() -> String {
    "gb".to_string()
}

/// Configuration for the booking wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    #[serde(default = "default_min_hours")]
    pub min_hours: u32,
    #[serde(default = "default_max_hours")]
    pub max_hours: u32,
    /// Hours preselected on step 4; clamped into the hour bounds on use.
    #[serde(default = "default_min_hours")]
    pub default_hours: u32,
    /// Simulated payment latency awaited before a booking completes.
    #[serde(default = "default_submit_latency_ms")]
    pub submit_latency_ms: u32,
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
    /// ISO country the address autocomplete is restricted to.
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            min_hours: default_min_hours(),
            max_hours: default_max_hours(),
            default_hours: default_min_hours(),
            submit_latency_ms: default_submit_latency_ms(),
            reference_prefix: default_reference_prefix(),
            country: default_country(),
        }
    }
}

impl WizardConfig {
    /// Parse wizard configuration from JSON. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the configuration shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed.
    pub fn load_from_static() -> Result<Self, serde_json::Error> {
        Self::from_json(WIZARD_DATA)
    }

    /// Hour bounds as `(min, max)`, kept inside 2..=12 and tolerating an
    /// inverted configuration.
    #[must_use]
    pub fn hour_bounds(&self) -> (u32, u32) {
        let min = self.min_hours.clamp(MIN_HOURS, MAX_HOURS);
        (min, self.max_hours.clamp(min, MAX_HOURS))
    }
}

/// How the step 2 address fields accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressEntry {
    /// Places autocomplete captures a place id; routes can be resolved.
    Autocomplete,
    /// Plain text; no place ids, no distance lookup.
    FreeText,
}

/// Mapping service credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapsConfig {
    pub api_key: Option<String>,
}

impl MapsConfig {
    #[must_use]
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            api_key: api_key.map(str::to_string),
        }
    }

    /// The configured key, unless it is missing, blank or a placeholder.
    #[must_use]
    pub fn usable_key(&self) -> Option<&str> {
        let key = self.api_key.as_deref()?.trim();
        if key.is_empty() || key == SAMPLE_MAPS_KEY || key.contains("placeholder") {
            None
        } else {
            Some(key)
        }
    }

    #[must_use]
    pub fn address_entry(&self) -> AddressEntry {
        if self.usable_key().is_some() {
            AddressEntry::Autocomplete
        } else {
            AddressEntry::FreeText
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_wizard_rules() {
        let cfg = WizardConfig::default();
        assert_eq!(cfg.hour_bounds(), (2, 12));
        assert_eq!(cfg.default_hours, 2);
        assert_eq!(cfg.submit_latency_ms, 2000);
        assert_eq!(cfg.reference_prefix, "UK");
        assert_eq!(WizardConfig::from_json("{}").unwrap(), cfg);
    }

    #[test]
    fn partial_json_overrides_selected_keys() {
        let cfg = WizardConfig::from_json(r#"{"max_hours": 8, "submit_latency_ms": 0}"#).unwrap();
        assert_eq!(cfg.hour_bounds(), (2, 8));
        assert_eq!(cfg.submit_latency_ms, 0);
    }

    #[test]
    fn inverted_bounds_collapse_to_minimum() {
        let cfg = WizardConfig {
            min_hours: 6,
            max_hours: 3,
            ..WizardConfig::default()
        };
        assert_eq!(cfg.hour_bounds(), (6, 6));
    }

    #[test]
    fn bounds_never_leave_the_hire_range() {
        let cfg = WizardConfig::from_json(r#"{"min_hours": 0, "max_hours": 24}"#).unwrap();
        assert_eq!(cfg.hour_bounds(), (2, 12));
        let cfg = WizardConfig::from_json(r#"{"min_hours": 14}"#).unwrap();
        assert_eq!(cfg.hour_bounds(), (12, 12));
    }

    #[test]
    fn shipped_configuration_matches_defaults() {
        assert_eq!(WizardConfig::load_from_static().unwrap(), WizardConfig::default());
    }

    #[test]
    fn missing_or_placeholder_keys_fall_back_to_free_text() {
        assert_eq!(MapsConfig::new(None).address_entry(), AddressEntry::FreeText);
        assert_eq!(MapsConfig::new(Some("  ")).address_entry(), AddressEntry::FreeText);
        assert_eq!(
            MapsConfig::new(Some(SAMPLE_MAPS_KEY)).address_entry(),
            AddressEntry::FreeText
        );
        assert_eq!(
            MapsConfig::new(Some("placeholder_key")).address_entry(),
            AddressEntry::FreeText
        );
        assert_eq!(
            MapsConfig::new(Some("AIzaRealKey")).address_entry(),
            AddressEntry::Autocomplete
        );
    }
}
