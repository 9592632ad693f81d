//! Step 6 page state: contact/payment inputs and the checkout outcome.
use std::rc::Rc;

use removals_booking::{BookingRecord, Field, FieldErrors, PaymentForm, Validation};
use yew::Reducible;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentState {
    pub form: PaymentForm,
    pub errors: FieldErrors,
    pub processing: bool,
    /// Form-level failure notice.
    pub notice: Option<String>,
    /// Set once checkout succeeds; the page switches to the confirmation.
    pub confirmed: Option<BookingRecord>,
}

pub enum PaymentAction {
    Edit(Field, String),
    Terms(bool),
    Rejected(Validation),
    Processing,
    Failed(String),
    Confirmed(BookingRecord),
}

impl PaymentState {
    pub fn apply(&mut self, action: PaymentAction) {
        match action {
            PaymentAction::Edit(field, value) => {
                let form = &mut self.form;
                match field {
                    Field::FullName => form.full_name = value,
                    Field::Email => form.email = value,
                    Field::Phone => form.phone = value,
                    Field::CardNumber => form.set_card_number(&value),
                    Field::ExpiryDate => form.set_expiry_date(&value),
                    Field::Cvv => form.cvv = value,
                    _ => return,
                }
                self.errors.clear(field);
            }
            PaymentAction::Terms(agreed) => {
                self.form.agree_terms = agreed;
                self.errors.clear(Field::AgreeTerms);
            }
            PaymentAction::Rejected(validation) => {
                self.errors = validation.field_errors;
                self.processing = false;
            }
            PaymentAction::Processing => {
                self.processing = true;
                self.notice = None;
            }
            PaymentAction::Failed(notice) => {
                self.processing = false;
                self.notice = Some(notice);
            }
            PaymentAction::Confirmed(record) => {
                self.processing = false;
                self.confirmed = Some(record);
            }
        }
    }
}

impl Reducible for PaymentState {
    type Action = PaymentAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}
