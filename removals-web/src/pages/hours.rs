use removals_booking::{BookingRecord, Hours, Step, hours_price};
use yew::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::step_header::StepHeader;
use crate::components::summary::BookingSummary;
use crate::format;

#[derive(Properties, Clone, PartialEq)]
pub struct HoursPageProps {
    pub record: BookingRecord,
    pub hours: Hours,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    pub on_increment: Callback<()>,
    pub on_decrement: Callback<()>,
    pub on_continue: Callback<()>,
    pub on_back: Callback<()>,
}

#[function_component(HoursPage)]
pub fn hours_page(props: &HoursPageProps) -> Html {
    let rate = props.record.vehicle_base_price.unwrap_or_default();
    let (min, max) = props.hours.bounds();
    let total = hours_price(rate, props.hours);

    let decrement = props.on_decrement.clone();
    let increment = props.on_increment.clone();
    let on_back = props.on_back.clone();
    let on_continue = props.on_continue.clone();

    html! {
        <section class="panel step step-hours" data-testid="step-4">
            <StepHeader step={Step::Hours} subtitle="How long will you need the van and crew?" />
            <div class="hours-picker">
                <button
                    type="button"
                    class="btn btn-round"
                    aria-label="Fewer hours"
                    disabled={props.hours.at_min()}
                    onclick={Callback::from(move |_| decrement.emit(()))}
                    data-testid="hours-decrement"
                >{ "-" }</button>
                <output class="hours-value" aria-live="polite" data-testid="hours-value">
                    { format::hours(props.hours.get()) }
                </output>
                <button
                    type="button"
                    class="btn btn-round"
                    aria-label="More hours"
                    disabled={props.hours.at_max()}
                    onclick={Callback::from(move |_| increment.emit(()))}
                    data-testid="hours-increment"
                >{ "+" }</button>
            </div>
            <p class="muted">{ format!("Minimum {min} hours, maximum {max} hours") }</p>
            <FieldError message={props.error.clone()} />
            <div class="price-breakdown">
                <p>{ format!("{} at {}", props.record.vehicle_name.as_deref().unwrap_or_default(), format::rate(rate)) }</p>
                <p class="price-total" data-testid="hours-total">
                    { format!("Total for {}: {}", format::hours(props.hours.get()), format::price(total)) }
                </p>
            </div>
            <BookingSummary record={props.record.clone()} />
            <div class="controls">
                <button type="button" class="btn btn-secondary" onclick={Callback::from(move |_| on_back.emit(()))}>
                    { "Back" }
                </button>
                <button type="button" class="btn btn-primary" onclick={Callback::from(move |_| on_continue.emit(()))}>
                    { "Continue" }
                </button>
            </div>
        </section>
    }
}
