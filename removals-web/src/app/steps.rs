//! Route containers: guard entry, hold per-page state and hand completed
//! steps to the booking engine.
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use removals_booking::{
    AddOnSelection, BookingRecord, ExtrasForm, Field, Hours, HoursForm, RouteResolver,
    SUBMIT_FAILURE_MESSAGE, ServiceForm, ServiceType, Step, StepError, StepForm, SubmitError,
    Validation, ValidationContext, VehicleForm,
};
use yew::prelude::*;
use yew_router::prelude::*;

use super::details::{DetailsAction, DetailsState};
use super::payment::{PaymentAction, PaymentState};
use super::{catalog, engine, guard};
use crate::maps::DistanceMatrix;
use crate::pages::confirmation::ConfirmationPage;
use crate::pages::details::DetailsPage;
use crate::pages::extras::ExtrasPage;
use crate::pages::home::HomePage;
use crate::pages::hours::HoursPage;
use crate::pages::not_found::NotFound;
use crate::pages::payment::PaymentPage;
use crate::pages::service::ServicePage;
use crate::pages::vehicle::VehiclePage;
use crate::router::{Route, StepQuery};
use crate::{dom, paths};

fn go(navigator: Option<&Navigator>, route: &Route, service: Option<ServiceType>) {
    let Some(nav) = navigator else {
        return;
    };
    if *route == Route::Home {
        nav.push(route);
    } else if let Err(err) = nav.push_with_query(route, &StepQuery::for_service(service)) {
        log::error!("navigation to {} failed: {err:?}", route.to_path());
    }
}

fn go_back(navigator: Option<&Navigator>, step: Step, record: &BookingRecord) {
    go(navigator, &guard::route_back(step), record.service_type);
}

/// Validate and save a step, then open the next one.
///
/// Returns the validation failure for the page to show. An incomplete earlier
/// step sends the user back to it; storage failures are logged and leave the
/// page as it is.
fn save_step<F: StepForm>(form: &F, navigator: Option<&Navigator>) -> Option<Validation> {
    let engine = engine();
    match engine.continue_step(form, dom::today()) {
        Ok(stage) => {
            log::debug!("{} saved, moving to {stage:?}", F::STEP);
            if let Some(route) = guard::route_after(stage) {
                let service = engine.current().and_then(|r| r.service_type);
                go(navigator, &route, service);
            }
            None
        }
        Err(StepError::Invalid(validation)) => Some(validation),
        Err(StepError::NotReady(earlier)) => {
            log::debug!("{} saved out of order, back to {earlier}", F::STEP);
            let service = engine.current().and_then(|r| r.service_type);
            go(navigator, &Route::from_step(earlier), service);
            None
        }
        Err(StepError::Store(err)) => {
            log::error!("could not save booking: {err}");
            dom::console_error(&format!("could not save booking: {err}"));
            None
        }
    }
}

fn message(validation: &Validation, field: Field) -> Option<AttrValue> {
    validation
        .field_errors
        .get(field)
        .map(|m| AttrValue::from(m.to_string()))
}

/// First message of a validation, for pages without per-field inputs.
fn first_message(validation: &Validation) -> Option<AttrValue> {
    validation
        .field_errors
        .iter()
        .next()
        .map(|(_, m)| AttrValue::from(m.to_string()))
}

struct StepVisit {
    record: BookingRecord,
    query: StepQuery,
    /// A redirect is under way; render nothing.
    blocked: bool,
}

/// Read the stored booking once per mount and redirect when `step` may not
/// be shown yet.
#[hook]
fn use_step_guard(step: Step) -> StepVisit {
    let navigator = use_navigator();
    let query = use_location()
        .and_then(|location| location.query::<StepQuery>().ok())
        .unwrap_or_default();
    let decision = {
        let query = query.clone();
        use_memo((), move |_| {
            let record = engine().current();
            let redirect = guard::redirect_for(step, &query, record.as_ref());
            (record, redirect)
        })
    };

    {
        let redirect = decision.1.clone();
        use_effect_with((), move |_| {
            if let (Some(nav), Some((route, query))) = (navigator, redirect) {
                log::debug!("{step} is not available yet; redirecting to {}", route.to_path());
                if let Err(err) = nav.replace_with_query(&route, &query) {
                    log::error!("redirect failed: {err:?}");
                }
            }
        });
    }

    StepVisit {
        record: decision.0.clone().unwrap_or_default(),
        query,
        blocked: decision.1.is_some(),
    }
}

#[function_component(HomeView)]
pub fn home_view() -> Html {
    let navigator = use_navigator();
    let on_start =
        Callback::from(move |service| go(navigator.as_ref(), &Route::Step1, Some(service)));
    html! { <HomePage {on_start} /> }
}

#[function_component(ServiceStep)]
pub fn service_step() -> Html {
    let visit = use_step_guard(Step::Service);
    let navigator = use_navigator();
    let selected = use_state(|| {
        visit
            .record
            .service_type
            .or_else(|| visit.query.service_type())
    });
    let error = use_state(|| None::<AttrValue>);
    if visit.blocked {
        return Html::default();
    }

    let on_select = {
        let selected = selected.clone();
        let error = error.clone();
        Callback::from(move |service| {
            selected.set(Some(service));
            error.set(None);
        })
    };
    let on_continue = {
        let selected = selected.clone();
        let error = error.clone();
        let navigator = navigator.clone();
        Callback::from(move |()| {
            let form = ServiceForm {
                service_type: *selected,
            };
            if let Some(validation) = save_step(&form, navigator.as_ref()) {
                error.set(message(&validation, Field::ServiceType));
            }
        })
    };
    let on_back = Callback::from(move |()| go_back(navigator.as_ref(), Step::Service, &visit.record));

    html! {
        <ServicePage selected={*selected} error={(*error).clone()} {on_select} {on_continue} {on_back} />
    }
}

#[function_component(DetailsStep)]
pub fn details_step() -> Html {
    let visit = use_step_guard(Step::Details);
    let navigator = use_navigator();
    let state = {
        let record = visit.record.clone();
        use_reducer(move || DetailsState::new(&record))
    };

    {
        let dispatcher = state.dispatcher();
        let pending = state.pending_request();
        use_effect_with((state.form.clone(), state.lookup.clone()), move |_| {
            if let Some(pair) = pending {
                dispatcher.dispatch(DetailsAction::RouteRequested(pair.clone()));
                wasm_bindgen_futures::spawn_local(async move {
                    let result = DistanceMatrix
                        .resolve_route(&pair.origin, &pair.destination)
                        .await;
                    dispatcher.dispatch(DetailsAction::RouteFinished(pair, result));
                });
            }
        });
    }

    if visit.blocked {
        return Html::default();
    }

    let on_edit = {
        let dispatcher = state.dispatcher();
        Callback::from(move |(field, value)| dispatcher.dispatch(DetailsAction::Edit(field, value)))
    };
    let on_place = {
        let dispatcher = state.dispatcher();
        Callback::from(move |(endpoint, place)| {
            dispatcher.dispatch(DetailsAction::Pick(endpoint, place));
        })
    };
    let on_continue = {
        let state = state.clone();
        let navigator = navigator.clone();
        Callback::from(move |()| {
            if let Some(validation) = save_step(&state.form, navigator.as_ref()) {
                state.dispatch(DetailsAction::Rejected(validation));
            }
        })
    };
    let on_back = {
        let record = visit.record.clone();
        Callback::from(move |()| go_back(navigator.as_ref(), Step::Details, &record))
    };

    let engine = engine();
    let min_date = ValidationContext::new(dom::today(), catalog()).earliest_date();
    html! {
        <DetailsPage
            form={state.form.clone()}
            errors={state.errors.clone()}
            entry={paths::maps_config().address_entry()}
            country={engine.config().country.clone()}
            time_slots={catalog().time_slots.clone()}
            {min_date}
            route_pending={state.route_pending()}
            {on_edit}
            {on_place}
            {on_continue}
            {on_back}
        />
    }
}

#[function_component(VehicleStep)]
pub fn vehicle_step() -> Html {
    let visit = use_step_guard(Step::Vehicle);
    let navigator = use_navigator();
    let selected = use_state(|| visit.record.vehicle.clone());
    let error = use_state(|| None::<AttrValue>);
    if visit.blocked {
        return Html::default();
    }

    let on_select = {
        let selected = selected.clone();
        let error = error.clone();
        Callback::from(move |id: String| {
            selected.set(Some(id));
            error.set(None);
        })
    };
    let on_continue = {
        let selected = selected.clone();
        let error = error.clone();
        let navigator = navigator.clone();
        Callback::from(move |()| {
            let form = VehicleForm {
                vehicle: (*selected).clone(),
            };
            if let Some(validation) = save_step(&form, navigator.as_ref()) {
                error.set(message(&validation, Field::Vehicle));
            }
        })
    };
    let on_back = {
        let record = visit.record.clone();
        Callback::from(move |()| go_back(navigator.as_ref(), Step::Vehicle, &record))
    };

    html! {
        <VehiclePage
            vehicles={catalog().vehicles.clone()}
            selected={(*selected).clone()}
            error={(*error).clone()}
            {on_select}
            {on_continue}
            {on_back}
        />
    }
}

#[function_component(HoursStep)]
pub fn hours_step() -> Html {
    let visit = use_step_guard(Step::Hours);
    let navigator = use_navigator();
    let hours = use_state(|| Hours::for_record(&visit.record, engine().config()));
    let error = use_state(|| None::<AttrValue>);
    if visit.blocked {
        return Html::default();
    }

    let adjust = |change: fn(&mut Hours)| {
        let hours = hours.clone();
        let error = error.clone();
        Callback::from(move |()| {
            let mut next = *hours;
            change(&mut next);
            hours.set(next);
            error.set(None);
        })
    };
    let on_increment = adjust(Hours::increment);
    let on_decrement = adjust(Hours::decrement);
    let on_continue = {
        let hours = hours.clone();
        let error = error.clone();
        let navigator = navigator.clone();
        Callback::from(move |()| {
            if let Some(validation) = save_step(&HoursForm { hours: *hours }, navigator.as_ref()) {
                error.set(message(&validation, Field::Hours));
            }
        })
    };
    let on_back = {
        let record = visit.record.clone();
        Callback::from(move |()| go_back(navigator.as_ref(), Step::Hours, &record))
    };

    html! {
        <HoursPage record={visit.record} hours={*hours} error={(*error).clone()} {on_increment} {on_decrement} {on_continue} {on_back} />
    }
}

#[function_component(ExtrasStep)]
pub fn extras_step() -> Html {
    let visit = use_step_guard(Step::Extras);
    let navigator = use_navigator();
    let selection = use_state(|| AddOnSelection::from_record(&visit.record));
    let error = use_state(|| None::<AttrValue>);
    if visit.blocked {
        return Html::default();
    }

    let on_toggle = {
        let selection = selection.clone();
        let error = error.clone();
        Callback::from(move |id: String| {
            let mut next = (*selection).clone();
            next.toggle(&id);
            selection.set(next);
            error.set(None);
        })
    };
    let on_continue = {
        let selection = selection.clone();
        let error = error.clone();
        let navigator = navigator.clone();
        Callback::from(move |()| {
            let form = ExtrasForm {
                selection: (*selection).clone(),
            };
            if let Some(validation) = save_step(&form, navigator.as_ref()) {
                error.set(first_message(&validation));
            }
        })
    };
    let on_back = {
        let record = visit.record.clone();
        Callback::from(move |()| go_back(navigator.as_ref(), Step::Extras, &record))
    };

    html! {
        <ExtrasPage
            record={visit.record}
            add_ons={catalog().add_ons.clone()}
            selection={(*selection).clone()}
            error={(*error).clone()}
            {on_toggle}
            {on_continue}
            {on_back}
        />
    }
}

#[function_component(PaymentStep)]
pub fn payment_step() -> Html {
    let visit = use_step_guard(Step::Payment);
    let navigator = use_navigator();
    let state = use_reducer(PaymentState::default);
    if visit.blocked {
        return Html::default();
    }

    if let Some(record) = state.confirmed.clone() {
        let on_home = Callback::from(move |()| go(navigator.as_ref(), &Route::Home, None));
        return html! { <ConfirmationPage {record} {on_home} /> };
    }

    let on_edit = {
        let dispatcher = state.dispatcher();
        Callback::from(move |(field, value)| dispatcher.dispatch(PaymentAction::Edit(field, value)))
    };
    let on_terms = {
        let dispatcher = state.dispatcher();
        Callback::from(move |agreed| dispatcher.dispatch(PaymentAction::Terms(agreed)))
    };
    let on_submit = {
        let state = state.clone();
        Callback::from(move |()| {
            if state.processing {
                return;
            }
            let engine = engine();
            let ctx = ValidationContext::new(dom::today(), engine.catalog());
            let validation = state.form.validate(&ctx);
            if !validation.valid() {
                state.dispatch(PaymentAction::Rejected(validation));
                return;
            }
            state.dispatch(PaymentAction::Processing);

            let form = state.form.clone();
            let dispatcher = state.dispatcher();
            let latency = i32::try_from(engine.config().submit_latency_ms).unwrap_or(i32::MAX);
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = dom::sleep_ms(latency).await {
                    dom::console_error(&dom::js_error_message(&err));
                }
                let mut rng = ChaCha20Rng::seed_from_u64(dom::entropy_seed());
                match engine.submit(&form, dom::today(), &mut rng) {
                    Ok(record) => dispatcher.dispatch(PaymentAction::Confirmed(record)),
                    Err(SubmitError::Invalid(validation)) => {
                        dispatcher.dispatch(PaymentAction::Rejected(validation));
                    }
                    Err(err) => {
                        dom::console_error(&format!("Booking submission failed: {err}"));
                        let notice = err.notice().unwrap_or(SUBMIT_FAILURE_MESSAGE);
                        dispatcher.dispatch(PaymentAction::Failed(notice.to_string()));
                    }
                }
            });
        })
    };
    let on_back = {
        let record = visit.record.clone();
        Callback::from(move |()| go_back(navigator.as_ref(), Step::Payment, &record))
    };

    html! {
        <PaymentPage
            record={visit.record}
            form={state.form.clone()}
            errors={state.errors.clone()}
            processing={state.processing}
            notice={state.notice.clone().map(AttrValue::from)}
            {on_edit}
            {on_terms}
            {on_submit}
            {on_back}
        />
    }
}

#[function_component(NotFoundView)]
pub fn not_found_view() -> Html {
    let navigator = use_navigator();
    let on_go_home = Callback::from(move |()| go(navigator.as_ref(), &Route::Home, None));
    html! { <NotFound {on_go_home} /> }
}
