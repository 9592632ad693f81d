use removals_booking::BookingRecord;
use yew::prelude::*;

use crate::components::summary::BookingSummary;
use crate::format;

#[derive(Properties, Clone, PartialEq)]
pub struct ConfirmationPageProps {
    pub record: BookingRecord,
    pub on_home: Callback<()>,
}

#[function_component(ConfirmationPage)]
pub fn confirmation_page(props: &ConfirmationPageProps) -> Html {
    let r = &props.record;
    let on_home = props.on_home.clone();
    html! {
        <section class="panel confirmation" aria-live="polite" data-testid="confirmation">
            <h1>{ "Booking Confirmed!" }</h1>
            <p>{ "Thank you for your booking. A confirmation has been sent to your email." }</p>
            <p class="reference">
                { "Booking reference: " }
                <strong data-testid="booking-reference">{ r.reference.clone().unwrap_or_default() }</strong>
            </p>
            <BookingSummary record={r.clone()} title={AttrValue::from("Booking Details")} show_route=true />
            if !r.additional_options.is_empty() {
                <ul class="addon-summary">
                    { for r.additional_options.iter().map(|o| html! {
                        <li>{ format!("{} {}", o.name, format::price(o.price)) }</li>
                    }) }
                </ul>
            }
            <p class="price-total">{ format!("Total Paid: {}", format::price(r.total_price.unwrap_or_default())) }</p>
            <button type="button" class="btn btn-primary" onclick={Callback::from(move |_| on_home.emit(()))}>
                { "Return to Home" }
            </button>
        </section>
    }
}
