//! Step 2 page state: address/schedule inputs plus the route lookup.
use std::rc::Rc;

use removals_booking::{
    AddressInput, BookingRecord, DetailsForm, Endpoint, Field, FieldErrors, PlaceSelection,
    RouteLookup, RoutePair, RouteResult, Validation,
};
use yew::Reducible;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsState {
    pub form: DetailsForm,
    pub errors: FieldErrors,
    pub lookup: RouteLookup,
}

pub enum DetailsAction {
    Edit(Field, String),
    Pick(Endpoint, PlaceSelection),
    RouteRequested(RoutePair),
    RouteFinished(RoutePair, RouteResult),
    Rejected(Validation),
}

impl DetailsState {
    #[must_use]
    pub fn new(record: &BookingRecord) -> Self {
        Self {
            form: DetailsForm::from_record(record),
            errors: FieldErrors::new(),
            lookup: RouteLookup::for_record(record),
        }
    }

    /// The lookup due for the current addresses, without starting it.
    #[must_use]
    pub fn pending_request(&self) -> Option<RoutePair> {
        self.lookup.clone().next_request(&self.form.route_record())
    }

    #[must_use]
    pub const fn route_pending(&self) -> bool {
        self.lookup.is_pending()
    }

    fn edit_address(&mut self, endpoint: Endpoint, f: impl FnOnce(&mut AddressInput)) {
        let mut input = match endpoint {
            Endpoint::Collection => self.form.collection.clone(),
            Endpoint::Delivery => self.form.delivery.clone(),
        };
        f(&mut input);
        self.form.set_address(endpoint, input);
    }

    pub fn apply(&mut self, action: DetailsAction) {
        match action {
            DetailsAction::Edit(field, value) => {
                match field {
                    // Typed text no longer matches a geocoded place.
                    Field::CollectionAddress => self.edit_address(Endpoint::Collection, |a| {
                        a.address = value;
                        a.place_id = None;
                    }),
                    Field::DeliveryAddress => self.edit_address(Endpoint::Delivery, |a| {
                        a.address = value;
                        a.place_id = None;
                    }),
                    Field::CollectionPostcode => self.form.collection.postcode = value,
                    Field::DeliveryPostcode => self.form.delivery.postcode = value,
                    Field::Date => self.form.date = value,
                    Field::Time => self.form.time = value,
                    _ => return,
                }
                self.errors.clear(field);
            }
            DetailsAction::Pick(endpoint, place) => {
                let (address_field, postcode_field) = match endpoint {
                    Endpoint::Collection => (Field::CollectionAddress, Field::CollectionPostcode),
                    Endpoint::Delivery => (Field::DeliveryAddress, Field::DeliveryPostcode),
                };
                let has_postcode = place.postcode.is_some();
                self.edit_address(endpoint, |a| {
                    a.address = place.formatted_address;
                    a.place_id = place.place_id;
                    if let Some(postcode) = place.postcode {
                        a.postcode = postcode;
                    }
                });
                self.errors.clear(address_field);
                if has_postcode {
                    self.errors.clear(postcode_field);
                }
            }
            DetailsAction::RouteRequested(pair) => {
                let started = self.lookup.next_request(&self.form.route_record());
                if started.as_ref() != Some(&pair) {
                    log::debug!("route request for a superseded pair was not started");
                }
            }
            DetailsAction::RouteFinished(pair, result) => {
                let mut scratch = self.form.route_record();
                if self.lookup.complete(&pair, result, &mut scratch) {
                    self.form.distance = scratch.distance;
                    self.form.duration = scratch.duration;
                }
            }
            DetailsAction::Rejected(validation) => self.errors = validation.field_errors,
        }
    }
}

impl Reducible for DetailsState {
    type Action = DetailsAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use removals_booking::{RouteStatus, ServiceType};

    fn pick(address: &str, place_id: &str, postcode: Option<&str>) -> PlaceSelection {
        PlaceSelection {
            formatted_address: address.to_string(),
            place_id: Some(place_id.to_string()),
            postcode: postcode.map(str::to_string),
        }
    }

    fn picked_both() -> DetailsState {
        let mut state = DetailsState::new(&BookingRecord::with_service(ServiceType::Residential));
        state.apply(DetailsAction::Pick(
            Endpoint::Collection,
            pick("1 High St, Leeds LS1 1AA, UK", "leeds", Some("LS1 1AA")),
        ));
        state.apply(DetailsAction::Pick(
            Endpoint::Delivery,
            pick("2 Low Rd, York, UK", "york", None),
        ));
        state
    }

    #[test]
    fn picking_fills_postcode_and_clears_errors() {
        let mut state = DetailsState::default();
        let mut validation = Validation::default();
        validation
            .field_errors
            .insert(Field::CollectionPostcode, "Collection postcode is required");
        state.apply(DetailsAction::Rejected(validation));
        state.apply(DetailsAction::Pick(
            Endpoint::Collection,
            pick("1 High St, Leeds LS1 1AA, UK", "leeds", Some("LS1 1AA")),
        ));
        assert_eq!(state.form.collection.postcode, "LS1 1AA");
        assert!(state.errors.is_empty());
    }

    #[test]
    fn route_request_fires_once_both_places_are_known() {
        let mut state = DetailsState::default();
        state.apply(DetailsAction::Pick(
            Endpoint::Collection,
            pick("Leeds", "leeds", None),
        ));
        assert_eq!(state.pending_request(), None);

        let mut state = picked_both();
        let pair = state.pending_request().unwrap();
        assert_eq!(pair, RoutePair::new("leeds", "york"));
        state.apply(DetailsAction::RouteRequested(pair.clone()));
        assert!(state.route_pending());
        assert_eq!(state.pending_request(), None);

        state.apply(DetailsAction::RouteFinished(
            pair,
            RouteResult::from_metric(40_000.0, 2_710.0),
        ));
        assert!(!state.route_pending());
        assert_eq!(state.form.duration, 46);
        assert_eq!(state.pending_request(), None);
    }

    #[test]
    fn typing_over_an_address_drops_its_place_and_route() {
        let mut state = picked_both();
        let pair = state.pending_request().unwrap();
        state.apply(DetailsAction::RouteRequested(pair.clone()));
        state.apply(DetailsAction::Edit(
            Field::DeliveryAddress,
            "2 Low Road, York".into(),
        ));
        state.apply(DetailsAction::RouteFinished(
            pair,
            RouteResult::from_metric(40_000.0, 2_710.0),
        ));
        assert_eq!(state.form.delivery.place_id, None);
        assert_eq!(state.form.duration, 0);
        assert_eq!(state.pending_request(), None);
    }

    #[test]
    fn failed_lookup_is_not_retried_for_the_same_pair() {
        let mut state = picked_both();
        let pair = state.pending_request().unwrap();
        state.apply(DetailsAction::RouteRequested(pair.clone()));
        state.apply(DetailsAction::RouteFinished(
            pair,
            RouteResult::failed(RouteStatus::Error),
        ));
        assert_eq!(state.form.duration, 0);
        assert_eq!(state.pending_request(), None);
    }
}
