use chrono::NaiveDate;
use removals_booking::{
    AddressEntry, DetailsForm, Endpoint, Field, FieldErrors, PlaceSelection, Step, TimeSlot,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::address_field::AddressField;
use crate::components::field_error::{FieldError, message_for};
use crate::components::step_header::StepHeader;
use crate::format;

#[derive(Properties, Clone, PartialEq)]
pub struct DetailsPageProps {
    pub form: DetailsForm,
    pub errors: FieldErrors,
    pub entry: AddressEntry,
    #[prop_or_else(|| AttrValue::from("gb"))]
    pub country: AttrValue,
    pub time_slots: Vec<TimeSlot>,
    /// Earliest selectable move date.
    pub min_date: NaiveDate,
    #[prop_or_default]
    pub route_pending: bool,
    pub on_edit: Callback<(Field, String)>,
    pub on_place: Callback<(Endpoint, PlaceSelection)>,
    pub on_continue: Callback<()>,
    pub on_back: Callback<()>,
}

fn edit_input(field: Field, on_edit: &Callback<(Field, String)>) -> Callback<InputEvent> {
    let cb = on_edit.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            cb.emit((field, input.value()));
        }
    })
}

fn text_input(
    id: &'static str,
    label: &'static str,
    field: Field,
    value: &str,
    p: &DetailsPageProps,
) -> Html {
    html! {
        <div class="form-field">
            <label for={id}>{ label }</label>
            <input
                {id}
                type="text"
                value={value.to_string()}
                oninput={edit_input(field, &p.on_edit)}
                aria-invalid={p.errors.contains(field).to_string()}
            />
            <FieldError message={message_for(&p.errors, field)} />
        </div>
    }
}

fn route_info(p: &DetailsPageProps) -> Html {
    if p.route_pending {
        html! { <p class="route-info muted" aria-live="polite">{ "Calculating distance between addresses..." }</p> }
    } else if p.form.distance > 0.0 {
        html! {
            <div class="route-info" aria-live="polite" data-testid="route-info">
                <p>{ format!("Distance: {}", format::miles(p.form.distance)) }</p>
                <p>{ format!("Estimated travel time: {}", format::minutes(p.form.duration)) }</p>
            </div>
        }
    } else {
        Html::default()
    }
}

#[function_component(DetailsPage)]
pub fn details_page(p: &DetailsPageProps) -> Html {
    let form = &p.form;
    let place = |endpoint: Endpoint| {
        let cb = p.on_place.clone();
        Callback::from(move |sel: PlaceSelection| cb.emit((endpoint, sel)))
    };
    let address_input = |field: Field| {
        let cb = p.on_edit.clone();
        Callback::from(move |value: String| cb.emit((field, value)))
    };

    let on_time = {
        let cb = p.on_edit.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                cb.emit((Field::Time, select.value()));
            }
        })
    };
    let on_submit = {
        let cb = p.on_continue.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };
    let on_back = p.on_back.clone();

    html! {
        <section class="panel step step-details" data-testid="step-2">
            <StepHeader step={Step::Details} subtitle="Where and when are you moving?" />
            <form onsubmit={on_submit}>
                <fieldset>
                    <legend>{ "Collection" }</legend>
                    <AddressField
                        id="collection-address"
                        label="Collection address"
                        placeholder="Enter full collection address"
                        value={form.collection.address.clone()}
                        entry={p.entry}
                        country={p.country.clone()}
                        error={message_for(&p.errors, Field::CollectionAddress)}
                        on_input={address_input(Field::CollectionAddress)}
                        on_place={place(Endpoint::Collection)}
                    />
                    { text_input("collection-postcode", "Collection postcode", Field::CollectionPostcode, &form.collection.postcode, p) }
                </fieldset>
                <fieldset>
                    <legend>{ "Delivery" }</legend>
                    <AddressField
                        id="delivery-address"
                        label="Delivery address"
                        placeholder="Enter full delivery address"
                        value={form.delivery.address.clone()}
                        entry={p.entry}
                        country={p.country.clone()}
                        error={message_for(&p.errors, Field::DeliveryAddress)}
                        on_input={address_input(Field::DeliveryAddress)}
                        on_place={place(Endpoint::Delivery)}
                    />
                    { text_input("delivery-postcode", "Delivery postcode", Field::DeliveryPostcode, &form.delivery.postcode, p) }
                </fieldset>
                { route_info(p) }
                <fieldset>
                    <legend>{ "Schedule" }</legend>
                    <div class="form-field">
                        <label for="move-date">{ "Moving date" }</label>
                        <input
                            id="move-date"
                            type="date"
                            min={format::date_input(p.min_date)}
                            value={form.date.clone()}
                            oninput={edit_input(Field::Date, &p.on_edit)}
                            aria-invalid={p.errors.contains(Field::Date).to_string()}
                        />
                        <FieldError message={message_for(&p.errors, Field::Date)} />
                    </div>
                    <div class="form-field">
                        <label for="move-time">{ "Preferred time" }</label>
                        <select id="move-time" onchange={on_time}
                            aria-invalid={p.errors.contains(Field::Time).to_string()}>
                            <option value="" selected={form.time.is_empty()}>{ "Select a time" }</option>
                            { for p.time_slots.iter().map(|slot| html! {
                                <option value={slot.value.clone()} selected={form.time == slot.value}>
                                    { slot.label.clone() }
                                </option>
                            }) }
                        </select>
                        <FieldError message={message_for(&p.errors, Field::Time)} />
                    </div>
                </fieldset>
                <div class="controls">
                    <button type="button" class="btn btn-secondary" onclick={Callback::from(move |_| on_back.emit(()))}>
                        { "Back" }
                    </button>
                    <button type="submit" class="btn btn-primary">{ "Continue" }</button>
                </div>
            </form>
        </section>
    }
}
