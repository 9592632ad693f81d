//! Step sequencer: guards, entry resolution and pure step transitions.
use std::fmt;

use crate::pricing::{self, AddOnSelection, Hours};
use crate::record::{AddressInput, BookingRecord, Endpoint, RecordField, ServiceType};
use crate::validate::{
    DetailsInput, Field, Validation, ValidationContext, parse_date, validate_details,
    validate_hours, validate_vehicle,
};

/// The six wizard pages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Service,
    Details,
    Vehicle,
    Hours,
    Extras,
    Payment,
}

/// Where the wizard stands after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    At(Step),
    Completed,
}

impl Step {
    pub const ALL: [Self; 6] = [
        Self::Service,
        Self::Details,
        Self::Vehicle,
        Self::Hours,
        Self::Extras,
        Self::Payment,
    ];
    pub const COUNT: u8 = 6;

    /// One-based position.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Service => 1,
            Self::Details => 2,
            Self::Vehicle => 3,
            Self::Hours => 4,
            Self::Extras => 5,
            Self::Payment => 6,
        }
    }

    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Service => "Select Service Type",
            Self::Details => "Addresses & Schedule",
            Self::Vehicle => "Choose Your Vehicle",
            Self::Hours => "Select Duration",
            Self::Extras => "Additional Services",
            Self::Payment => "Your Details & Payment",
        }
    }

    #[must_use]
    pub const fn next(self) -> Stage {
        match self {
            Self::Service => Stage::At(Self::Details),
            Self::Details => Stage::At(Self::Vehicle),
            Self::Vehicle => Stage::At(Self::Hours),
            Self::Hours => Stage::At(Self::Extras),
            Self::Extras => Stage::At(Self::Payment),
            Self::Payment => Stage::Completed,
        }
    }

    /// The page a back link leads to. `None` is the home page.
    #[must_use]
    pub const fn back(self) -> Option<Self> {
        match self {
            Self::Service => None,
            Self::Details => Some(Self::Service),
            Self::Vehicle => Some(Self::Details),
            Self::Hours => Some(Self::Vehicle),
            Self::Extras => Some(Self::Hours),
            Self::Payment => Some(Self::Extras),
        }
    }

    /// Fields this step writes into the record.
    #[must_use]
    pub const fn required_fields(self) -> &'static [RecordField] {
        match self {
            Self::Service => &[RecordField::ServiceType],
            Self::Details => &[
                RecordField::CollectionAddress,
                RecordField::CollectionPostcode,
                RecordField::DeliveryAddress,
                RecordField::DeliveryPostcode,
                RecordField::Date,
                RecordField::Time,
            ],
            Self::Vehicle => &[
                RecordField::Vehicle,
                RecordField::VehicleName,
                RecordField::VehicleBasePrice,
            ],
            Self::Hours => &[
                RecordField::Hours,
                RecordField::BasePrice,
                RecordField::TotalHoursPrice,
            ],
            Self::Extras => &[RecordField::TotalPrice],
            Self::Payment => &[],
        }
    }

    #[must_use]
    pub fn is_complete_in(self, record: &BookingRecord) -> bool {
        self.required_fields().iter().all(|field| record.has(*field))
    }

    #[must_use]
    pub fn path(self) -> String {
        format!("/booking/step{}", self.number())
    }

    /// Route including the service-type query.
    #[must_use]
    pub fn href(self, service: Option<ServiceType>) -> String {
        match service {
            Some(service) => format!("{}?type={service}", self.path()),
            None => self.path(),
        }
    }

    #[must_use]
    pub fn progress_percent(self) -> f64 {
        f64::from(self.number()) * 100.0 / f64::from(Self::COUNT)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step{}", self.number())
    }
}

/// Earliest step before `step` whose fields are missing from the record.
#[must_use]
pub fn missing_prerequisite(step: Step, record: &BookingRecord) -> Option<Step> {
    Step::ALL
        .into_iter()
        .take_while(|earlier| *earlier < step)
        .find(|earlier| !earlier.is_complete_in(record))
}

#[must_use]
pub fn can_enter(step: Step, record: &BookingRecord) -> bool {
    missing_prerequisite(step, record).is_none()
}

/// Result of arriving at a step's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Enter,
    Redirect(Step),
}

/// Decide whether a visit to `step` may render or must bounce backward.
///
/// `record` is `None` when the in-progress slot is empty or unreadable.
#[must_use]
pub fn resolve_entry(step: Step, query: Option<&str>, record: Option<&BookingRecord>) -> Entry {
    if step == Step::Service {
        return Entry::Enter;
    }
    if ServiceType::from_query(query).is_none() {
        log::debug!("{step}: missing or invalid service type, back to step1");
        return Entry::Redirect(Step::Service);
    }
    let Some(record) = record.filter(|record| record.is_supported_version()) else {
        log::debug!("{step}: no booking in progress, back to step1");
        return Entry::Redirect(Step::Service);
    };
    match missing_prerequisite(step, record) {
        Some(earlier) => {
            log::debug!("{step}: prerequisites missing, back to {earlier}");
            Entry::Redirect(earlier)
        }
        None => Entry::Enter,
    }
}

/// A record produced by a successful step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub record: BookingRecord,
    pub next: Stage,
}

/// A step's form: validates its inputs and writes its slice of the record.
pub trait StepForm {
    const STEP: Step;

    fn validate(&self, record: &BookingRecord, ctx: &ValidationContext<'_>) -> Validation;

    /// Write this step's fields. Only called after `validate` passed.
    fn apply(&self, record: &mut BookingRecord, ctx: &ValidationContext<'_>);
}

/// Why a step form was not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Refusal {
    /// An earlier step has not been completed; nothing was written.
    #[error("{0} must be completed first")]
    NotReady(Step),
    #[error("step inputs are invalid")]
    Invalid(Validation),
}

/// Validate a step form and, if it passes, return the updated record.
///
/// # Errors
///
/// Returns [`Refusal::NotReady`] with the earliest incomplete step when the
/// record lacks an earlier step's fields, or [`Refusal::Invalid`] with
/// per-field messages when any input is invalid. Either way the input record
/// is left as it was.
pub fn advance<F: StepForm>(
    record: &BookingRecord,
    form: &F,
    ctx: &ValidationContext<'_>,
) -> Result<Transition, Refusal> {
    if let Some(earlier) = missing_prerequisite(F::STEP, record) {
        log::debug!("{}: prerequisites missing, {earlier} first", F::STEP);
        return Err(Refusal::NotReady(earlier));
    }
    let validation = form.validate(record, ctx);
    if !validation.valid() {
        log::debug!(
            "{}: {} field(s) invalid",
            F::STEP,
            validation.field_errors.len()
        );
        return Err(Refusal::Invalid(validation));
    }
    let mut updated = record.clone();
    form.apply(&mut updated, ctx);
    pricing::reprice(&mut updated);
    Ok(Transition {
        record: updated,
        next: F::STEP.next(),
    })
}

/// Step 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceForm {
    pub service_type: Option<ServiceType>,
}

impl StepForm for ServiceForm {
    const STEP: Step = Step::Service;

    fn validate(&self, _record: &BookingRecord, _ctx: &ValidationContext<'_>) -> Validation {
        let mut v = Validation::default();
        if self.service_type.is_none() {
            v.field_errors
                .insert(Field::ServiceType, "Please select a service type");
        }
        v
    }

    fn apply(&self, record: &mut BookingRecord, _ctx: &ValidationContext<'_>) {
        record.service_type = self.service_type;
    }
}

/// Step 2.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsForm {
    pub collection: AddressInput,
    pub delivery: AddressInput,
    pub date: String,
    pub time: String,
    /// Route figures resolved while the page was open.
    pub distance: f64,
    pub duration: u32,
}

impl DetailsForm {
    /// Prefill from a record, e.g. when navigating back to step 2.
    #[must_use]
    pub fn from_record(record: &BookingRecord) -> Self {
        Self {
            collection: record.address(Endpoint::Collection),
            delivery: record.address(Endpoint::Delivery),
            date: record
                .date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            time: record.time.clone().unwrap_or_default(),
            distance: record.distance,
            duration: record.duration,
        }
    }

    #[must_use]
    pub fn input(&self) -> DetailsInput<'_> {
        DetailsInput {
            collection_address: &self.collection.address,
            collection_postcode: &self.collection.postcode,
            delivery_address: &self.delivery.address,
            delivery_postcode: &self.delivery.postcode,
            date: &self.date,
            time: &self.time,
        }
    }

    /// Scratch record holding only the addresses and route figures, for
    /// driving a [`crate::routing::RouteLookup`] before the step is saved.
    #[must_use]
    pub fn route_record(&self) -> BookingRecord {
        let mut record = BookingRecord::new();
        record.set_address(Endpoint::Collection, self.collection.clone());
        record.set_address(Endpoint::Delivery, self.delivery.clone());
        record.distance = self.distance;
        record.duration = self.duration;
        record
    }

    pub fn set_address(&mut self, endpoint: Endpoint, input: AddressInput) {
        let slot = match endpoint {
            Endpoint::Collection => &mut self.collection,
            Endpoint::Delivery => &mut self.delivery,
        };
        if slot.place_id != input.place_id {
            self.distance = 0.0;
            self.duration = 0;
        }
        *slot = input;
    }
}

impl StepForm for DetailsForm {
    const STEP: Step = Step::Details;

    fn validate(&self, _record: &BookingRecord, ctx: &ValidationContext<'_>) -> Validation {
        validate_details(&self.input(), ctx)
    }

    fn apply(&self, record: &mut BookingRecord, _ctx: &ValidationContext<'_>) {
        record.set_address(Endpoint::Collection, self.collection.clone());
        record.set_address(Endpoint::Delivery, self.delivery.clone());
        if record.route_pair().is_some() {
            record.distance = self.distance;
            record.duration = self.duration;
        }
        record.date = parse_date(&self.date);
        record.time = Some(self.time.trim().to_string());
    }
}

/// Step 3.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleForm {
    pub vehicle: Option<String>,
}

impl StepForm for VehicleForm {
    const STEP: Step = Step::Vehicle;

    fn validate(&self, _record: &BookingRecord, ctx: &ValidationContext<'_>) -> Validation {
        validate_vehicle(self.vehicle.as_deref(), ctx)
    }

    fn apply(&self, record: &mut BookingRecord, ctx: &ValidationContext<'_>) {
        if let Some(vehicle) = self.vehicle.as_deref().and_then(|id| ctx.catalog.vehicle(id)) {
            record.vehicle = Some(vehicle.id.clone());
            record.vehicle_name = Some(vehicle.name.clone());
            record.vehicle_base_price = Some(vehicle.base_price);
        }
    }
}

/// Step 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoursForm {
    pub hours: Hours,
}

impl StepForm for HoursForm {
    const STEP: Step = Step::Hours;

    fn validate(&self, _record: &BookingRecord, _ctx: &ValidationContext<'_>) -> Validation {
        validate_hours(self.hours.get())
    }

    fn apply(&self, record: &mut BookingRecord, _ctx: &ValidationContext<'_>) {
        let rate = record.vehicle_base_price.unwrap_or_default();
        record.hours = Some(self.hours.get());
        record.base_price = Some(rate);
        record.total_hours_price = Some(pricing::hours_price(rate, self.hours));
    }
}

/// Step 5.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtrasForm {
    pub selection: AddOnSelection,
}

impl StepForm for ExtrasForm {
    const STEP: Step = Step::Extras;

    fn validate(&self, _record: &BookingRecord, _ctx: &ValidationContext<'_>) -> Validation {
        Validation::default()
    }

    fn apply(&self, record: &mut BookingRecord, ctx: &ValidationContext<'_>) {
        let options = self.selection.resolve(ctx.catalog);
        let quote =
            pricing::quote_with_hours_price(record.total_hours_price.unwrap_or_default(), &options);
        record.additional_options = options;
        record.additional_options_price = quote.additional_options_price;
        record.total_price = Some(quote.total_price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn details() -> DetailsForm {
        DetailsForm {
            collection: AddressInput {
                address: "1 High Street, Leeds".into(),
                postcode: "LS1 1AA".into(),
                place_id: None,
            },
            delivery: AddressInput {
                address: "2 Low Road, York".into(),
                postcode: "YO1 1AA".into(),
                place_id: None,
            },
            date: "2026-10-20".into(),
            time: "10:00".into(),
            distance: 0.0,
            duration: 0,
        }
    }

    fn through_vehicle(catalog: &Catalog) -> BookingRecord {
        let ctx = ValidationContext::new(today(), catalog);
        let mut record = BookingRecord::new();
        record = advance(
            &record,
            &ServiceForm {
                service_type: Some(ServiceType::Residential),
            },
            &ctx,
        )
        .unwrap()
        .record;
        record = advance(&record, &details(), &ctx).unwrap().record;
        advance(
            &record,
            &VehicleForm {
                vehicle: Some("medium_van".into()),
            },
            &ctx,
        )
        .unwrap()
        .record
    }

    #[test]
    fn steps_number_and_link_in_order() {
        assert_eq!(Step::from_number(4), Some(Step::Hours));
        assert_eq!(Step::from_number(7), None);
        assert_eq!(Step::Vehicle.href(Some(ServiceType::Business)), "/booking/step3?type=business");
        assert_eq!(Step::Payment.next(), Stage::Completed);
        assert_eq!(Step::Service.back(), None);
        assert_eq!(Step::Hours.back(), Some(Step::Vehicle));
        assert!((Step::Payment.progress_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn step_one_is_always_enterable() {
        assert_eq!(resolve_entry(Step::Service, None, None), Entry::Enter);
        assert_eq!(resolve_entry(Step::Service, Some("bogus"), None), Entry::Enter);
    }

    #[test]
    fn invalid_query_redirects_to_step_one() {
        let record = BookingRecord::with_service(ServiceType::Business);
        assert_eq!(
            resolve_entry(Step::Details, Some("industrial"), Some(&record)),
            Entry::Redirect(Step::Service)
        );
        assert_eq!(
            resolve_entry(Step::Details, None, Some(&record)),
            Entry::Redirect(Step::Service)
        );
    }

    #[test]
    fn absent_record_redirects_to_step_one() {
        assert_eq!(
            resolve_entry(Step::Hours, Some("residential"), None),
            Entry::Redirect(Step::Service)
        );
    }

    #[test]
    fn missing_vehicle_redirects_to_step_three() {
        let catalog = Catalog::load_from_static().unwrap();
        let mut record = through_vehicle(&catalog);
        record.vehicle = None;
        assert_eq!(
            resolve_entry(Step::Hours, Some("residential"), Some(&record)),
            Entry::Redirect(Step::Vehicle)
        );
        assert!(!can_enter(Step::Hours, &record));
        assert!(can_enter(Step::Vehicle, &record));
    }

    #[test]
    fn redirect_targets_earliest_gap() {
        let mut record = BookingRecord::with_service(ServiceType::Residential);
        record.vehicle = Some("small_van".into());
        record.vehicle_name = Some("Small Van".into());
        record.vehicle_base_price = Some(45);
        assert_eq!(
            resolve_entry(Step::Extras, Some("residential"), Some(&record)),
            Entry::Redirect(Step::Details)
        );
    }

    #[test]
    fn failed_validation_leaves_record_untouched() {
        let catalog = Catalog::load_from_static().unwrap();
        let ctx = ValidationContext::new(today(), &catalog);
        let record = BookingRecord::with_service(ServiceType::Business);
        let mut form = details();
        form.date = "2026-10-14".into();
        let Err(Refusal::Invalid(validation)) = advance(&record, &form, &ctx) else {
            panic!("past date should fail validation");
        };
        assert!(validation.field_errors.contains(Field::Date));
        assert_eq!(record, BookingRecord::with_service(ServiceType::Business));
    }

    #[test]
    fn full_walk_prices_the_booking() {
        let catalog = Catalog::load_from_static().unwrap();
        let ctx = ValidationContext::new(today(), &catalog);
        let record = through_vehicle(&catalog);
        assert_eq!(record.vehicle_base_price, Some(65));

        let t = advance(&record, &HoursForm { hours: Hours::new(4) }, &ctx).unwrap();
        assert_eq!(t.next, Stage::At(Step::Extras));
        assert_eq!(t.record.total_hours_price, Some(260));

        let mut selection = AddOnSelection::new();
        selection.toggle("extra_helper");
        selection.toggle("packing_service");
        let t = advance(&t.record, &ExtrasForm { selection }, &ctx).unwrap();
        assert_eq!(t.next, Stage::At(Step::Payment));
        assert_eq!(t.record.additional_options_price, 65);
        assert_eq!(t.record.total_price, Some(325));
        assert_eq!(
            resolve_entry(Step::Payment, Some("residential"), Some(&t.record)),
            Entry::Enter
        );
    }

    #[test]
    fn changing_vehicle_later_reprices_hours_and_total() {
        let catalog = Catalog::load_from_static().unwrap();
        let ctx = ValidationContext::new(today(), &catalog);
        let record = through_vehicle(&catalog);
        let record = advance(&record, &HoursForm { hours: Hours::new(3) }, &ctx)
            .unwrap()
            .record;
        let record = advance(&record, &ExtrasForm::default(), &ctx).unwrap().record;
        assert_eq!(record.total_price, Some(195));

        let record = advance(
            &record,
            &VehicleForm {
                vehicle: Some("luton_van".into()),
            },
            &ctx,
        )
        .unwrap()
        .record;
        assert_eq!(record.total_hours_price, Some(330));
        assert_eq!(record.total_price, Some(330));
    }

    #[test]
    fn details_form_round_trips_through_record() {
        let catalog = Catalog::load_from_static().unwrap();
        let ctx = ValidationContext::new(today(), &catalog);
        let record = advance(&BookingRecord::with_service(ServiceType::Residential), &details(), &ctx)
            .unwrap()
            .record;
        assert_eq!(DetailsForm::from_record(&record), details());
    }

    #[test]
    fn retyping_an_address_drops_route_figures() {
        let mut form = details();
        form.collection.place_id = Some("leeds".into());
        form.delivery.place_id = Some("york".into());
        form.distance = 24.9;
        form.duration = 46;
        assert_eq!(form.route_record().route_pair(), Some(("leeds", "york")));

        form.set_address(
            Endpoint::Delivery,
            AddressInput {
                address: "2 Low Road, Yor".into(),
                postcode: "YO1 1AA".into(),
                place_id: None,
            },
        );
        assert_eq!(form.duration, 0);
        assert_eq!(form.route_record().route_pair(), None);
    }

    #[test]
    fn later_steps_refuse_an_incomplete_record() {
        let catalog = Catalog::load_from_static().unwrap();
        let ctx = ValidationContext::new(today(), &catalog);
        let empty = BookingRecord::new();
        assert_eq!(
            advance(&empty, &HoursForm { hours: Hours::new(4) }, &ctx),
            Err(Refusal::NotReady(Step::Service))
        );

        let mut selection = AddOnSelection::new();
        selection.toggle("extra_helper");
        let partial = BookingRecord::with_service(ServiceType::Business);
        assert_eq!(
            advance(&partial, &ExtrasForm { selection }, &ctx),
            Err(Refusal::NotReady(Step::Details))
        );
        assert_eq!(partial, BookingRecord::with_service(ServiceType::Business));
    }

    #[test]
    fn hours_without_a_priced_vehicle_are_refused() {
        let catalog = Catalog::load_from_static().unwrap();
        let ctx = ValidationContext::new(today(), &catalog);
        let mut record = through_vehicle(&catalog);
        record.vehicle_base_price = None;
        assert_eq!(
            advance(&record, &HoursForm { hours: Hours::new(4) }, &ctx),
            Err(Refusal::NotReady(Step::Vehicle))
        );
    }

    #[test]
    fn hours_outside_the_hire_range_fail_validation() {
        let catalog = Catalog::load_from_static().unwrap();
        let ctx = ValidationContext::new(today(), &catalog);
        let record = through_vehicle(&catalog);
        let form = HoursForm {
            hours: Hours::with_bounds(20, (2, 24)),
        };
        let Err(Refusal::Invalid(validation)) = advance(&record, &form, &ctx) else {
            panic!("20 hours should fail validation");
        };
        assert_eq!(
            validation.field_errors.get(Field::Hours),
            Some("Please choose between 2 and 12 hours")
        );
    }
}
