#![allow(clippy::float_cmp)]

use chrono::NaiveDate;
use futures::executor::block_on;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use removals_booking::{
    AddOnSelection, AddressInput, BookingEngine, BookingRecord, Catalog, DetailsForm, Endpoint,
    Entry, ExtrasForm, Field, FixedRoutes, Hours, HoursForm, MemoryStore, PaymentForm,
    RouteLookup, RouteResult, RouteStatus, ServiceForm, ServiceType, Stage, Step, StepError,
    SubmitError, VehicleForm, WizardConfig,
};

const QUERY: Option<&str> = Some("residential");

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

fn engine() -> anyhow::Result<BookingEngine<MemoryStore>> {
    Ok(BookingEngine::new(
        MemoryStore::new(),
        Catalog::load_from_static()?,
        WizardConfig::default(),
    ))
}

fn address(address: &str, postcode: &str, place_id: Option<&str>) -> AddressInput {
    AddressInput {
        address: address.to_string(),
        postcode: postcode.to_string(),
        place_id: place_id.map(str::to_string),
    }
}

fn details() -> DetailsForm {
    DetailsForm {
        collection: address("1 High Street, Leeds", "LS1 1AA", Some("leeds")),
        delivery: address("2 Low Road, York", "YO1 1AA", Some("york")),
        date: "2026-10-15".into(),
        time: "09:00".into(),
        distance: 24.9,
        duration: 46,
    }
}

fn payment() -> PaymentForm {
    let mut form = PaymentForm {
        full_name: "Sam Taylor".into(),
        email: "sam@example.com".into(),
        phone: "0113 496 0000".into(),
        cvv: "123".into(),
        agree_terms: true,
        ..PaymentForm::default()
    };
    form.set_card_number("4000123412341234");
    form.set_expiry_date("1026");
    form
}

/// Runs steps 1-5 for a medium van, four hours, helper plus packing.
fn walk_to_payment(engine: &BookingEngine<MemoryStore>) -> anyhow::Result<()> {
    let service = ServiceForm {
        service_type: Some(ServiceType::Residential),
    };
    assert_eq!(engine.continue_step(&service, today())?, Stage::At(Step::Details));
    assert_eq!(engine.continue_step(&details(), today())?, Stage::At(Step::Vehicle));
    let vehicle = VehicleForm {
        vehicle: Some("medium_van".into()),
    };
    assert_eq!(engine.continue_step(&vehicle, today())?, Stage::At(Step::Hours));
    let hours = HoursForm {
        hours: Hours::new(4),
    };
    assert_eq!(engine.continue_step(&hours, today())?, Stage::At(Step::Extras));
    let mut selection = AddOnSelection::new();
    selection.toggle("extra_helper");
    selection.toggle("packing_service");
    let extras = ExtrasForm { selection };
    assert_eq!(engine.continue_step(&extras, today())?, Stage::At(Step::Payment));
    Ok(())
}

#[test]
fn residential_booking_runs_end_to_end() -> anyhow::Result<()> {
    let engine = engine()?;
    walk_to_payment(&engine)?;

    let record = engine.current().unwrap();
    assert_eq!(record.vehicle_name.as_deref(), Some("Medium Van"));
    assert_eq!(record.total_hours_price, Some(260));
    assert_eq!(record.additional_options_price, 65);
    assert_eq!(record.total_price, Some(325));
    assert_eq!(record.distance, 24.9);
    assert_eq!(engine.enter(Step::Payment, QUERY), Entry::Enter);

    let mut rng = ChaCha20Rng::seed_from_u64(0xB00C);
    let done = engine.submit(&payment(), today(), &mut rng)?;
    let reference = done.reference.clone().unwrap();
    assert!(reference.starts_with("UK-"));
    assert_eq!(reference.len(), 9);
    assert_eq!(engine.completed(), Some(done));

    // The in-progress slot is gone, so step 6 now sends the visitor home.
    assert_eq!(engine.current(), None);
    assert_eq!(
        engine.enter(Step::Payment, QUERY),
        Entry::Redirect(Step::Service)
    );
    Ok(())
}

#[test]
fn every_later_step_redirects_without_a_record() -> anyhow::Result<()> {
    let engine = engine()?;
    for step in &Step::ALL[1..] {
        assert_eq!(engine.enter(*step, QUERY), Entry::Redirect(Step::Service));
    }
    Ok(())
}

#[test]
fn guards_point_at_the_earliest_gap() -> anyhow::Result<()> {
    let engine = engine()?;
    walk_to_payment(&engine)?;
    let mut record = engine.current().unwrap_or_default();
    record.vehicle = None;
    record.time = None;
    engine.store().save(&record)?;
    assert_eq!(engine.enter(Step::Payment, QUERY), Entry::Redirect(Step::Details));
    assert_eq!(engine.enter(Step::Details, QUERY), Entry::Enter);
    assert_eq!(
        engine.enter(Step::Payment, Some("commercial")),
        Entry::Redirect(Step::Service)
    );
    Ok(())
}

#[test]
fn steps_taken_out_of_order_write_nothing() -> anyhow::Result<()> {
    let engine = engine()?;
    let hours = HoursForm {
        hours: Hours::new(4),
    };
    let Err(StepError::NotReady(step)) = engine.continue_step(&hours, today()) else {
        panic!("hours should need a service type first");
    };
    assert_eq!(step, Step::Service);

    let mut selection = AddOnSelection::new();
    selection.toggle("extra_helper");
    let extras = ExtrasForm { selection };
    assert!(matches!(
        engine.continue_step(&extras, today()),
        Err(StepError::NotReady(Step::Service))
    ));
    assert_eq!(engine.current(), None);

    let service = ServiceForm {
        service_type: Some(ServiceType::Residential),
    };
    engine.continue_step(&service, today())?;
    engine.continue_step(&details(), today())?;
    let before = engine.current();
    assert!(matches!(
        engine.continue_step(&hours, today()),
        Err(StepError::NotReady(Step::Vehicle))
    ));
    assert!(matches!(
        engine.continue_step(&extras, today()),
        Err(StepError::NotReady(Step::Vehicle))
    ));
    let after = engine.current();
    assert_eq!(after, before);
    assert_eq!(after.and_then(|r| r.total_price), None);
    Ok(())
}

#[test]
fn failed_steps_leave_the_stored_record_alone() -> anyhow::Result<()> {
    let engine = engine()?;
    walk_to_payment(&engine)?;
    let before = engine.current();

    let mut form = details();
    form.collection.postcode.clear();
    form.date = "2026-10-14".into();
    let Err(StepError::Invalid(validation)) = engine.continue_step(&form, today()) else {
        panic!("details should fail validation");
    };
    assert_eq!(
        validation.field_errors.get(Field::CollectionPostcode),
        Some("Collection postcode is required")
    );
    assert!(validation.field_errors.contains(Field::Date));
    assert_eq!(engine.current(), before);
    Ok(())
}

#[test]
fn expired_card_and_missing_terms_block_checkout() -> anyhow::Result<()> {
    let engine = engine()?;
    walk_to_payment(&engine)?;
    let mut rng = ChaCha20Rng::seed_from_u64(1);

    let mut expired = payment();
    expired.set_expiry_date("09/26");
    let Err(SubmitError::Invalid(validation)) = engine.submit(&expired, today(), &mut rng) else {
        panic!("expired card should fail");
    };
    assert_eq!(
        validation.field_errors.get(Field::ExpiryDate),
        Some("Card has expired")
    );

    let mut current_month = payment();
    current_month.agree_terms = false;
    current_month.set_expiry_date("10/26");
    let Err(SubmitError::Invalid(validation)) = engine.submit(&current_month, today(), &mut rng)
    else {
        panic!("unchecked terms should fail");
    };
    assert_eq!(validation.field_errors.len(), 1);
    assert!(validation.field_errors.contains(Field::AgreeTerms));

    assert!(engine.current().is_some());
    assert_eq!(engine.completed(), None);
    Ok(())
}

#[test]
fn hours_from_the_record_clamp_into_range() {
    let cfg = WizardConfig::default();
    let record = BookingRecord {
        hours: Some(30),
        ..BookingRecord::default()
    };
    assert_eq!(Hours::for_record(&record, &cfg).get(), 12);
    assert_eq!(Hours::for_record(&BookingRecord::new(), &cfg).get(), 2);
}

#[test]
fn route_lookup_follows_the_latest_addresses() {
    let routes = FixedRoutes::new()
        .with_route("leeds", "york", RouteResult::from_metric(40_000.0, 2_710.0))
        .with_route("leeds", "hull", RouteResult::from_metric(96_560.0, 4_500.0));
    let mut record = BookingRecord::with_service(ServiceType::Business);
    let mut lookup = RouteLookup::new();

    record.set_address(Endpoint::Collection, address("Leeds", "LS1 1AA", Some("leeds")));
    assert_eq!(block_on(lookup.refresh(&routes, &mut record)), None);

    record.set_address(Endpoint::Delivery, address("York", "YO1 1AA", Some("york")));
    assert_eq!(
        block_on(lookup.refresh(&routes, &mut record)),
        Some(RouteStatus::Ok)
    );
    assert_eq!(record.distance, 24.9);

    record.set_address(Endpoint::Delivery, address("Hull", "HU1 1AA", Some("hull")));
    assert_eq!(record.distance, 0.0);
    assert_eq!(
        block_on(lookup.refresh(&routes, &mut record)),
        Some(RouteStatus::Ok)
    );
    assert_eq!(record.distance, 60.0);
    assert_eq!(record.duration, 75);
    assert_eq!(routes.calls(), 2);
}
