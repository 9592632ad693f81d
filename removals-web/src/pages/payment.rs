use removals_booking::validate::{CARD_INPUT_MAX_LEN, EXPIRY_INPUT_MAX_LEN};
use removals_booking::{BookingRecord, Field, FieldErrors, PaymentForm, Step};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::field_error::{FieldError, message_for};
use crate::components::step_header::StepHeader;
use crate::components::summary::BookingSummary;
use crate::format;

#[derive(Properties, Clone, PartialEq)]
pub struct PaymentPageProps {
    pub record: BookingRecord,
    pub form: PaymentForm,
    pub errors: FieldErrors,
    #[prop_or_default]
    pub processing: bool,
    #[prop_or_default]
    pub notice: Option<AttrValue>,
    pub on_edit: Callback<(Field, String)>,
    pub on_terms: Callback<bool>,
    pub on_submit: Callback<()>,
    pub on_back: Callback<()>,
}

struct InputAttrs {
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    placeholder: &'static str,
    max_len: Option<usize>,
}

const fn attrs(
    id: &'static str,
    label: &'static str,
    kind: &'static str,
    placeholder: &'static str,
) -> InputAttrs {
    InputAttrs {
        id,
        label,
        kind,
        placeholder,
        max_len: None,
    }
}

fn input(field: Field, attrs: &InputAttrs, value: &str, p: &PaymentPageProps) -> Html {
    let oninput = {
        let cb = p.on_edit.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                cb.emit((field, input.value()));
            }
        })
    };
    html! {
        <div class="form-field">
            <label for={attrs.id}>{ attrs.label }</label>
            <input
                id={attrs.id}
                type={attrs.kind}
                placeholder={attrs.placeholder}
                maxlength={attrs.max_len.map(|n| n.to_string())}
                value={value.to_string()}
                disabled={p.processing}
                {oninput}
                aria-invalid={p.errors.contains(field).to_string()}
            />
            <FieldError message={message_for(&p.errors, field)} />
        </div>
    }
}

#[function_component(PaymentPage)]
pub fn payment_page(p: &PaymentPageProps) -> Html {
    let form = &p.form;
    let on_terms = {
        let cb = p.on_terms.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                cb.emit(input.checked());
            }
        })
    };
    let on_submit = {
        let cb = p.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };
    let on_back = p.on_back.clone();
    let submit_label = if p.processing {
        "Processing..."
    } else {
        "Confirm Booking"
    };
    let card = InputAttrs {
        max_len: Some(CARD_INPUT_MAX_LEN),
        ..attrs("card-number", "Card number", "text", "1234 5678 9012 3456")
    };
    let expiry = InputAttrs {
        max_len: Some(EXPIRY_INPUT_MAX_LEN),
        ..attrs("expiry-date", "Expiry date", "text", "MM/YY")
    };
    let cvv = InputAttrs {
        max_len: Some(4),
        ..attrs("cvv", "CVV", "text", "123")
    };

    html! {
        <section class="panel step step-payment" data-testid="step-6">
            <StepHeader step={Step::Payment} subtitle="Almost done! Enter your details to confirm" />
            <BookingSummary record={p.record.clone()} show_route=true />
            <p class="price-total" data-testid="payment-total">
                { format!("Total: {}", format::price(p.record.total_price.unwrap_or_default())) }
            </p>
            <form onsubmit={on_submit}>
                <fieldset>
                    <legend>{ "Contact details" }</legend>
                    { input(Field::FullName, &attrs("full-name", "Full name", "text", "John Smith"), &form.full_name, p) }
                    { input(Field::Email, &attrs("email", "Email", "email", "john@example.com"), &form.email, p) }
                    { input(Field::Phone, &attrs("phone", "Phone number", "tel", "07700 900123"), &form.phone, p) }
                </fieldset>
                <fieldset>
                    <legend>{ "Payment details" }</legend>
                    { input(Field::CardNumber, &card, &form.card_number, p) }
                    { input(Field::ExpiryDate, &expiry, &form.expiry_date, p) }
                    { input(Field::Cvv, &cvv, &form.cvv, p) }
                </fieldset>
                <div class="form-field checkbox">
                    <input id="agree-terms" type="checkbox" checked={form.agree_terms}
                        disabled={p.processing} onchange={on_terms} />
                    <label for="agree-terms">{ "I agree to the terms and conditions" }</label>
                    <FieldError message={message_for(&p.errors, Field::AgreeTerms)} />
                </div>
                if let Some(notice) = p.notice.clone() {
                    <p class="form-notice" role="alert">{ notice }</p>
                }
                <div class="controls">
                    <button type="button" class="btn btn-secondary" disabled={p.processing}
                        onclick={Callback::from(move |_| on_back.emit(()))}>
                        { "Back" }
                    </button>
                    <button type="submit" class="btn btn-primary" disabled={p.processing} data-testid="payment-submit">
                        { submit_label }
                    </button>
                </div>
            </form>
        </section>
    }
}
