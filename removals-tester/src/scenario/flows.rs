use anyhow::{Context, Result, bail, ensure};
use async_trait::async_trait;
use chrono::{Datelike, Months};
use removals_booking::{
    AddOnSelection, AddressInput, BookingEngine, DetailsForm, Endpoint, Entry, ExtrasForm, Field,
    FixedRoutes, Hours, HoursForm, MemoryStore, PaymentForm, RouteLookup, RouteResult,
    RouteStatus, ServiceForm, ServiceType, Stage, Step, StepError, SubmitError, Validation,
    ValidationContext, VehicleForm,
};

use super::{Scenario, ScenarioCtx};

/// 60 miles / 75 minutes once converted.
const LEEDS_YORK: (f64, f64) = (96_560.0, 4_500.0);

/// Booking choices derived from the run seed.
#[derive(Debug, Clone)]
struct BookingPlan {
    service: ServiceType,
    vehicle: String,
    rate: u32,
    hours: u32,
    add_ons: Vec<(String, u32)>,
}

impl BookingPlan {
    fn for_seed<S: removals_booking::KeyValueStore>(
        seed: u64,
        engine: &BookingEngine<S>,
    ) -> Result<Self> {
        let catalog = engine.catalog();
        ensure!(!catalog.vehicles.is_empty(), "catalog offers no vehicles");
        let pick = usize::try_from(seed % catalog.vehicles.len() as u64).unwrap_or(0);
        let vehicle = &catalog.vehicles[pick];
        let add_ons = catalog
            .add_ons
            .iter()
            .enumerate()
            .filter(|(i, _)| (seed.rotate_right(3) >> i) & 1 == 1)
            .map(|(_, a)| (a.id.clone(), a.price))
            .collect();
        Ok(Self {
            service: ServiceType::ALL[usize::from(seed % 2 == 1)],
            vehicle: vehicle.id.clone(),
            rate: vehicle.base_price,
            hours: 2 + u32::try_from(seed % 11).unwrap_or(0),
            add_ons,
        })
    }

    fn expected_total(&self) -> u32 {
        self.rate * self.hours + self.add_ons.iter().map(|(_, p)| p).sum::<u32>()
    }
}

fn address(address: &str, postcode: &str, place_id: &str) -> AddressInput {
    AddressInput {
        address: address.to_string(),
        postcode: postcode.to_string(),
        place_id: Some(place_id.to_string()),
    }
}

fn details(ctx: &ScenarioCtx, engine: &BookingEngine<MemoryStore>) -> DetailsForm {
    let earliest = ValidationContext::new(ctx.today, engine.catalog()).earliest_date();
    DetailsForm {
        collection: address("1 High Street, Leeds", "LS1 1AA", "leeds"),
        delivery: address("2 Low Road, York", "YO1 1AA", "york"),
        date: earliest.format("%Y-%m-%d").to_string(),
        time: "09:00".into(),
        ..DetailsForm::default()
    }
}

fn payment(ctx: &ScenarioCtx) -> PaymentForm {
    let mut form = PaymentForm {
        full_name: "Sam Taylor".into(),
        email: "sam@example.com".into(),
        phone: "0113 496 0000".into(),
        cvv: "123".into(),
        agree_terms: true,
        ..PaymentForm::default()
    };
    form.set_card_number("4000123412341234");
    form.set_expiry_date(&ctx.today.format("%m%y").to_string());
    form
}

fn expect_stage(actual: Stage, step: Step) -> Result<()> {
    ensure!(
        actual == Stage::At(step),
        "expected to move to {step}, got {actual:?}"
    );
    Ok(())
}

/// Complete steps 1-5 following the plan.
fn walk_to_payment(
    ctx: &ScenarioCtx,
    engine: &BookingEngine<MemoryStore>,
    plan: &BookingPlan,
) -> Result<()> {
    let service = ServiceForm {
        service_type: Some(plan.service),
    };
    expect_stage(engine.continue_step(&service, ctx.today)?, Step::Details)?;
    expect_stage(engine.continue_step(&details(ctx, engine), ctx.today)?, Step::Vehicle)?;
    let vehicle = VehicleForm {
        vehicle: Some(plan.vehicle.clone()),
    };
    expect_stage(engine.continue_step(&vehicle, ctx.today)?, Step::Hours)?;
    let hours = HoursForm {
        hours: Hours::new(i64::from(plan.hours)),
    };
    expect_stage(engine.continue_step(&hours, ctx.today)?, Step::Extras)?;
    let mut selection = AddOnSelection::new();
    for (id, _) in &plan.add_ons {
        selection.toggle(id);
    }
    expect_stage(
        engine.continue_step(&ExtrasForm { selection }, ctx.today)?,
        Step::Payment,
    )?;
    ctx.note(&format!(
        "{} {} for {}h with {} add-ons",
        plan.service,
        plan.vehicle,
        plan.hours,
        plan.add_ons.len()
    ));
    Ok(())
}

fn rejected_field(err: SubmitError, field: Field) -> Result<String> {
    let SubmitError::Invalid(Validation { field_errors }) = err else {
        bail!("expected {} to be rejected, got: {err}", field.name());
    };
    field_errors
        .get(field)
        .map(str::to_string)
        .with_context(|| format!("no error reported for {}", field.name()))
}

pub struct HappyPath;

#[async_trait(?Send)]
impl Scenario for HappyPath {
    fn name(&self) -> &'static str {
        "happy-path"
    }

    fn description(&self) -> &'static str {
        "Seeded booking from step 1 to confirmation"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let engine = ctx.engine()?;
        let plan = BookingPlan::for_seed(ctx.seed, &engine)?;
        walk_to_payment(ctx, &engine, &plan)?;

        let record = engine.current().context("booking missing before payment")?;
        ensure!(
            record.total_price == Some(plan.expected_total()),
            "quote {:?} does not match expected {}",
            record.total_price,
            plan.expected_total()
        );

        let done = engine.submit(&payment(ctx), ctx.today, &mut ctx.rng())?;
        let reference = done.reference.clone().context("no booking reference")?;
        ctx.note(&format!("confirmed as {reference}"));
        ensure!(
            reference.starts_with("UK-") && reference.len() == 9,
            "unexpected reference {reference}"
        );
        ensure!(engine.current().is_none(), "in-progress booking not cleared");
        ensure!(
            engine.completed().as_ref() == Some(&done),
            "completed booking not stored"
        );
        ensure!(
            engine.enter(Step::Payment, Some(plan.service.as_str()))
                == Entry::Redirect(Step::Service),
            "step 6 still reachable after confirmation"
        );
        Ok(())
    }
}

pub struct GuardRedirects;

#[async_trait(?Send)]
impl Scenario for GuardRedirects {
    fn name(&self) -> &'static str {
        "guard-redirects"
    }

    fn description(&self) -> &'static str {
        "Later steps bounce back to the earliest incomplete step"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let engine = ctx.engine()?;
        ensure!(engine.enter(Step::Service, None) == Entry::Enter);
        for step in &Step::ALL[1..] {
            ensure!(
                engine.enter(*step, Some("residential")) == Entry::Redirect(Step::Service),
                "{step} entered without a booking"
            );
        }

        let service = ServiceForm {
            service_type: Some(ServiceType::Business),
        };
        engine.continue_step(&service, ctx.today)?;
        ensure!(engine.enter(Step::Details, Some("business")) == Entry::Enter);
        ensure!(
            engine.enter(Step::Details, Some("storage")) == Entry::Redirect(Step::Service),
            "unknown service type accepted"
        );
        ensure!(
            engine.enter(Step::Extras, Some("business")) == Entry::Redirect(Step::Details),
            "step 5 entered before step 2 was done"
        );
        let skipped = ExtrasForm {
            selection: AddOnSelection::new(),
        };
        match engine.continue_step(&skipped, ctx.today) {
            Err(StepError::NotReady(Step::Details)) => {}
            other => bail!("step 5 saved before step 2 was done: {other:?}"),
        }
        ensure!(
            engine.current().and_then(|r| r.total_price).is_none(),
            "refused step wrote a price"
        );

        let unsaved = DetailsForm {
            date: ctx.today.format("%Y-%m-%d").to_string(),
            ..details(ctx, &engine)
        };
        match engine.continue_step(&unsaved, ctx.today) {
            Err(StepError::Invalid(v)) if v.field_errors.contains(Field::Date) => {}
            other => bail!("same-day move was not rejected: {other:?}"),
        }
        ensure!(
            engine.enter(Step::Vehicle, Some("business")) == Entry::Redirect(Step::Details),
            "rejected step unlocked the next one"
        );
        Ok(())
    }
}

pub struct ExpiredCard;

#[async_trait(?Send)]
impl Scenario for ExpiredCard {
    fn name(&self) -> &'static str {
        "expired-card"
    }

    fn description(&self) -> &'static str {
        "A card that expired last month is refused; this month's is accepted"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let engine = ctx.engine()?;
        let plan = BookingPlan::for_seed(ctx.seed, &engine)?;
        walk_to_payment(ctx, &engine, &plan)?;

        let last_month = ctx
            .today
            .with_day(1)
            .and_then(|d| d.checked_sub_months(Months::new(1)))
            .context("no previous month")?;
        let mut form = payment(ctx);
        form.set_expiry_date(&last_month.format("%m%y").to_string());
        let err = engine
            .submit(&form, ctx.today, &mut ctx.rng())
            .err()
            .context("expired card was accepted")?;
        let message = rejected_field(err, Field::ExpiryDate)?;
        ensure!(message == "Card has expired", "unexpected message {message:?}");
        ensure!(engine.current().is_some(), "booking lost after refusal");
        ensure!(engine.completed().is_none(), "refused booking was completed");

        engine.submit(&payment(ctx), ctx.today, &mut ctx.rng())?;
        ensure!(engine.completed().is_some());
        Ok(())
    }
}

pub struct TermsRequired;

#[async_trait(?Send)]
impl Scenario for TermsRequired {
    fn name(&self) -> &'static str {
        "terms-required"
    }

    fn description(&self) -> &'static str {
        "Checkout is blocked until the terms are accepted"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let engine = ctx.engine()?;
        let plan = BookingPlan::for_seed(ctx.seed, &engine)?;
        walk_to_payment(ctx, &engine, &plan)?;

        let form = PaymentForm {
            agree_terms: false,
            ..payment(ctx)
        };
        let err = engine
            .submit(&form, ctx.today, &mut ctx.rng())
            .err()
            .context("booking confirmed without accepting terms")?;
        ensure!(err.notice().is_none(), "validation failure showed a notice");
        let message = rejected_field(err, Field::AgreeTerms)?;
        ensure!(
            message == "You must agree to the terms and conditions",
            "unexpected message {message:?}"
        );
        ensure!(engine.completed().is_none());
        Ok(())
    }
}

pub struct RouteLookupFlow;

#[async_trait(?Send)]
impl Scenario for RouteLookupFlow {
    fn name(&self) -> &'static str {
        "route-lookup"
    }

    fn description(&self) -> &'static str {
        "One lookup per address pair; figures follow the latest addresses"
    }

    async fn run(&self, ctx: &ScenarioCtx) -> Result<()> {
        let engine = ctx.engine()?;
        engine.continue_step(
            &ServiceForm {
                service_type: Some(ServiceType::Residential),
            },
            ctx.today,
        )?;
        let resolver = FixedRoutes::new().with_route(
            "leeds",
            "york",
            RouteResult::from_metric(LEEDS_YORK.0, LEEDS_YORK.1),
        );

        let mut form = details(ctx, &engine);
        let mut lookup = RouteLookup::new();
        let mut scratch = form.route_record();
        let status = lookup.refresh(&resolver, &mut scratch).await;
        ensure!(status == Some(RouteStatus::Ok), "lookup status {status:?}");
        ensure!(
            (scratch.distance - 60.0).abs() < 1e-9 && scratch.duration == 75,
            "route figures {} mi / {} min",
            scratch.distance,
            scratch.duration
        );
        ensure!(
            lookup.refresh(&resolver, &mut scratch).await.is_none(),
            "same pair looked up twice"
        );
        ensure!(resolver.calls() == 1);
        form.distance = scratch.distance;
        form.duration = scratch.duration;

        form.set_address(Endpoint::Delivery, address("9 Dock St, Hull", "HU1 1AA", "hull"));
        ensure!(form.distance.abs() < f64::EPSILON, "stale distance kept after address change");
        let mut scratch = form.route_record();
        let status = lookup.refresh(&resolver, &mut scratch).await;
        ensure!(status == Some(RouteStatus::NotFound), "lookup status {status:?}");
        ensure!(resolver.calls() == 2);

        expect_stage(engine.continue_step(&form, ctx.today)?, Step::Vehicle)?;
        let saved = engine.current().context("details not saved")?;
        ensure!(saved.delivery_place_id.as_deref() == Some("hull"));
        ensure!(saved.distance.abs() < f64::EPSILON && saved.duration == 0);
        ctx.note("unroutable pair saved without distance");
        Ok(())
    }
}
