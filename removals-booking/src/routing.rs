//! Geocoding/routing collaborator contract.
//!
//! The wizard asks an external service for the driving distance between the
//! two resolved addresses. Distance is informational only: failures degrade
//! to "no distance shown" and never block the step.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::HashMap;

use crate::numbers::{meters_to_miles, seconds_to_minutes};
use crate::record::BookingRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStatus {
    Ok,
    NotFound,
    Error,
}

impl RouteStatus {
    /// Map a routing service status string.
    #[must_use]
    pub fn from_service(status: &str) -> Self {
        match status {
            "OK" => Self::Ok,
            "NOT_FOUND" | "ZERO_RESULTS" => Self::NotFound,
            _ => Self::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub distance_miles: f64,
    pub duration_minutes: u32,
    pub status: RouteStatus,
}

impl RouteResult {
    /// Successful result from raw service units (metres, seconds).
    #[must_use]
    pub fn from_metric(meters: f64, seconds: f64) -> Self {
        Self {
            distance_miles: meters_to_miles(meters),
            duration_minutes: seconds_to_minutes(seconds),
            status: RouteStatus::Ok,
        }
    }

    #[must_use]
    pub const fn failed(status: RouteStatus) -> Self {
        Self {
            distance_miles: 0.0,
            duration_minutes: 0,
            status,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == RouteStatus::Ok
    }
}

/// Resolves a driving route between two opaque place identifiers.
#[async_trait(?Send)]
pub trait RouteResolver {
    async fn resolve_route(&self, origin: &str, destination: &str) -> RouteResult;
}

/// The endpoints of one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePair {
    pub origin: String,
    pub destination: String,
}

impl RoutePair {
    #[must_use]
    pub fn new(origin: &str, destination: &str) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
        }
    }

    #[must_use]
    pub fn of(record: &BookingRecord) -> Option<Self> {
        record
            .route_pair()
            .map(|(origin, destination)| Self::new(origin, destination))
    }
}

/// Issues at most one lookup per distinct pair of place ids.
///
/// A pair is settled once any attempt for it finishes; editing either
/// address produces a new pair and re-arms the lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteLookup {
    settled: Option<RoutePair>,
    in_flight: Option<RoutePair>,
}

impl RouteLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a saved record; a stored distance counts as settled.
    #[must_use]
    pub fn for_record(record: &BookingRecord) -> Self {
        Self {
            settled: record.has_route().then(|| RoutePair::of(record)).flatten(),
            in_flight: None,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The pair to look up now, if any. Marks it in flight.
    pub fn next_request(&mut self, record: &BookingRecord) -> Option<RoutePair> {
        if self.in_flight.is_some() {
            return None;
        }
        let pair = RoutePair::of(record)?;
        if self.settled.as_ref() == Some(&pair) {
            return None;
        }
        self.in_flight = Some(pair.clone());
        Some(pair)
    }

    /// Record a finished lookup. Figures are written only for an OK result
    /// whose pair still matches the record. Returns whether they were.
    pub fn complete(
        &mut self,
        pair: &RoutePair,
        result: RouteResult,
        record: &mut BookingRecord,
    ) -> bool {
        if self.in_flight.as_ref() == Some(pair) {
            self.in_flight = None;
        }
        if RoutePair::of(record).as_ref() != Some(pair) {
            log::debug!("discarding route result for a superseded address pair");
            return false;
        }
        self.settled = Some(pair.clone());
        if !result.is_ok() {
            log::warn!("route lookup returned {:?}; continuing without distance", result.status);
            return false;
        }
        record.distance = result.distance_miles;
        record.duration = result.duration_minutes;
        true
    }

    /// Run the pending lookup, if one is due, to completion.
    pub async fn refresh<R>(&mut self, resolver: &R, record: &mut BookingRecord) -> Option<RouteStatus>
    where
        R: RouteResolver + ?Sized,
    {
        let pair = self.next_request(record)?;
        let result = resolver.resolve_route(&pair.origin, &pair.destination).await;
        self.complete(&pair, result, record);
        Some(result.status)
    }
}

/// In-memory resolver with canned answers. Unknown pairs are `NOT_FOUND`.
#[derive(Debug, Default)]
pub struct FixedRoutes {
    routes: HashMap<RoutePair, RouteResult>,
    calls: Cell<usize>,
}

impl FixedRoutes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_route(mut self, origin: &str, destination: &str, result: RouteResult) -> Self {
        self.routes.insert(RoutePair::new(origin, destination), result);
        self
    }

    /// How many lookups have been served.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl RouteResolver for FixedRoutes {
    async fn resolve_route(&self, origin: &str, destination: &str) -> RouteResult {
        self.calls.set(self.calls.get() + 1);
        self.routes
            .get(&RoutePair::new(origin, destination))
            .copied()
            .unwrap_or_else(|| RouteResult::failed(RouteStatus::NotFound))
    }
}

/// One component of a geocoded address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// An address picked from the autocomplete dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceSelection {
    pub formatted_address: String,
    pub place_id: Option<String>,
    pub postcode: Option<String>,
}

/// Postcode from the first component typed `postal_code`.
#[must_use]
pub fn extract_postcode(components: &[AddressComponent]) -> Option<String> {
    components
        .iter()
        .find(|component| component.types.iter().any(|t| t == "postal_code"))
        .map(|component| component.long_name.clone())
}
