//! Pricing: hourly vehicle rate plus flat add-ons.
use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::config::WizardConfig;
use crate::record::{BookingRecord, SelectedAddOn};

pub const MIN_HOURS: u32 = 2;
pub const MAX_HOURS: u32 = 12;

/// Hire duration, always inside its bounds.
///
/// Out-of-range requests clamp to the nearest bound when the value is
/// adjusted; pricing never sees an out-of-range duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hours {
    value: u32,
    min: u32,
    max: u32,
}

impl Default for Hours {
    fn default() -> Self {
        Self::new(i64::from(MIN_HOURS))
    }
}

impl Hours {
    /// Clamp a requested duration into the standard 2..=12 hour range.
    #[must_use]
    pub fn new(requested: i64) -> Self {
        Self::with_bounds(requested, (MIN_HOURS, MAX_HOURS))
    }

    #[must_use]
    pub fn with_bounds(requested: i64, bounds: (u32, u32)) -> Self {
        let (min, max) = bounds;
        let max = max.max(min);
        let mut hours = Self {
            value: min,
            min,
            max,
        };
        hours.set(requested);
        hours
    }

    /// Starting duration from configuration, or the record's saved hours.
    #[must_use]
    pub fn for_record(record: &BookingRecord, cfg: &WizardConfig) -> Self {
        let requested = record.hours.unwrap_or(cfg.default_hours);
        Self::with_bounds(i64::from(requested), cfg.hour_bounds())
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.value
    }

    #[must_use]
    pub const fn bounds(self) -> (u32, u32) {
        (self.min, self.max)
    }

    pub fn set(&mut self, requested: i64) {
        let clamped = requested.clamp(i64::from(self.min), i64::from(self.max));
        self.value = u32::try_from(clamped).unwrap_or(self.min);
    }

    pub fn increment(&mut self) {
        self.set(i64::from(self.value) + 1);
    }

    pub fn decrement(&mut self) {
        self.set(i64::from(self.value) - 1);
    }

    #[must_use]
    pub const fn at_min(self) -> bool {
        self.value <= self.min
    }

    #[must_use]
    pub const fn at_max(self) -> bool {
        self.value >= self.max
    }
}

/// Ordered set of add-on ids picked on step 5.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOnSelection {
    ids: Vec<String>,
}

impl AddOnSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the selection saved on a record.
    #[must_use]
    pub fn from_record(record: &BookingRecord) -> Self {
        let mut selection = Self::new();
        for option in &record.additional_options {
            selection.select(&option.id);
        }
        selection
    }

    /// Flip an add-on in or out. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.ids.retain(|existing| existing != id);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn select(&mut self, id: &str) {
        if !self.contains(id) {
            self.ids.push(id.to_string());
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Catalog entries for the selected ids in selection order. Ids the
    /// catalog does not know are skipped.
    #[must_use]
    pub fn resolve(&self, catalog: &Catalog) -> Vec<SelectedAddOn> {
        self.ids
            .iter()
            .filter_map(|id| catalog.add_on(id))
            .map(crate::catalog::AddOn::to_selected)
            .collect()
    }
}

/// Derived price figures for the current selections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quote {
    pub total_hours_price: u32,
    pub additional_options_price: u32,
    pub total_price: u32,
}

impl Quote {
    #[must_use]
    pub const fn new(total_hours_price: u32, additional_options_price: u32) -> Self {
        Self {
            total_hours_price,
            additional_options_price,
            total_price: total_hours_price.saturating_add(additional_options_price),
        }
    }
}

/// Rate times hours.
#[must_use]
pub const fn hours_price(rate: u32, hours: Hours) -> u32 {
    rate.saturating_mul(hours.get())
}

/// Sum of add-on prices, counting each id once.
#[must_use]
pub fn add_ons_price(options: &[SelectedAddOn]) -> u32 {
    let mut seen = HashSet::new();
    options
        .iter()
        .filter(|option| seen.insert(option.id.as_str()))
        .fold(0_u32, |total, option| total.saturating_add(option.price))
}

/// Full quote for a rate, a duration and a set of add-ons.
#[must_use]
pub fn quote(rate: u32, hours: Hours, options: &[SelectedAddOn]) -> Quote {
    Quote::new(hours_price(rate, hours), add_ons_price(options))
}

/// Quote for step 5, where the hours price is already fixed on the record.
#[must_use]
pub fn quote_with_hours_price(total_hours_price: u32, options: &[SelectedAddOn]) -> Quote {
    Quote::new(total_hours_price, add_ons_price(options))
}

/// Bring every derived price on the record in line with its inputs.
///
/// Only figures whose step has already run are touched.
pub fn reprice(record: &mut BookingRecord) {
    if let (Some(rate), Some(hours)) = (record.vehicle_base_price, record.hours) {
        record.base_price = Some(rate);
        record.total_hours_price = Some(rate.saturating_mul(hours));
    }
    if record.total_price.is_some() {
        let q = quote_with_hours_price(
            record.total_hours_price.unwrap_or_default(),
            &record.additional_options,
        );
        record.additional_options_price = q.additional_options_price;
        record.total_price = Some(q.total_price);
    }
}
