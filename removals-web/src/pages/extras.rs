use removals_booking::pricing::quote_with_hours_price;
use removals_booking::{AddOn, AddOnSelection, BookingRecord, Step};
use yew::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::step_header::StepHeader;
use crate::components::summary::BookingSummary;
use crate::format;

#[derive(Properties, Clone, PartialEq)]
pub struct ExtrasPageProps {
    pub record: BookingRecord,
    pub add_ons: Vec<AddOn>,
    pub selection: AddOnSelection,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    pub on_toggle: Callback<String>,
    pub on_continue: Callback<()>,
    pub on_back: Callback<()>,
}

fn add_on_row(add_on: &AddOn, checked: bool, on_toggle: &Callback<String>) -> Html {
    let input_id = format!("addon-{}", add_on.id);
    let onchange = {
        let cb = on_toggle.clone();
        let id = add_on.id.clone();
        Callback::from(move |_: Event| cb.emit(id.clone()))
    };
    html! {
        <li class={classes!("addon", checked.then_some("selected"))}>
            <input type="checkbox" id={input_id.clone()} {checked} {onchange} />
            <label for={input_id}>
                <span class="addon-name">{ add_on.name.clone() }</span>
                <span class="addon-description">{ add_on.description.clone() }</span>
                <span class="addon-price">{ format!("+{}", format::price(add_on.price)) }</span>
            </label>
        </li>
    }
}

#[function_component(ExtrasPage)]
pub fn extras_page(props: &ExtrasPageProps) -> Html {
    let selected: Vec<_> = props
        .add_ons
        .iter()
        .filter(|a| props.selection.contains(&a.id))
        .map(AddOn::to_selected)
        .collect();
    let quote = quote_with_hours_price(
        props.record.total_hours_price.unwrap_or_default(),
        &selected,
    );

    let on_back = props.on_back.clone();
    let on_continue = props.on_continue.clone();

    html! {
        <section class="panel step step-extras" data-testid="step-5">
            <StepHeader step={Step::Extras} subtitle="Add any extra help you need (optional)" />
            <ul class="addon-list">
                { for props.add_ons.iter().map(|a| add_on_row(a, props.selection.contains(&a.id), &props.on_toggle)) }
            </ul>
            <div class="price-breakdown" data-testid="extras-quote">
                <p>{ format!("Hours: {}", format::price(quote.total_hours_price)) }</p>
                <p>{ format!("Additional services: {}", format::price(quote.additional_options_price)) }</p>
                <p class="price-total">{ format!("Total: {}", format::price(quote.total_price)) }</p>
            </div>
            <FieldError message={props.error.clone()} />
            <BookingSummary record={props.record.clone()} />
            <div class="controls">
                <button type="button" class="btn btn-secondary" onclick={Callback::from(move |_| on_back.emit(()))}>
                    { "Back" }
                </button>
                <button type="button" class="btn btn-primary" onclick={Callback::from(move |_| on_continue.emit(()))}>
                    { "Continue to Payment" }
                </button>
            </div>
        </section>
    }
}
