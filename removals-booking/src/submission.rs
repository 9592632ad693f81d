//! Mock checkout: validate contact/payment details and confirm the booking.
//!
//! Nothing leaves the client. Once validation passes the booking always
//! succeeds; the only failure after validation is the local store refusing a
//! write, which surfaces as a generic retryable notice.
use rand::Rng;

use crate::record::BookingRecord;
use crate::store::{BookingStore, KeyValueStore};
use crate::validate::{
    PaymentInput, Validation, ValidationContext, format_card_number, format_expiry,
    validate_payment,
};
use crate::wizard::{Step, can_enter};

/// Shown when a valid submission could not be completed.
pub const SUBMIT_FAILURE_MESSAGE: &str =
    "There was an error processing your payment. Please try again.";

const REFERENCE_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const REFERENCE_LEN: usize = 6;

/// Step 6 inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub agree_terms: bool,
}

impl PaymentForm {
    #[must_use]
    pub fn input(&self) -> PaymentInput<'_> {
        PaymentInput {
            full_name: &self.full_name,
            email: &self.email,
            phone: &self.phone,
            card_number: &self.card_number,
            expiry_date: &self.expiry_date,
            cvv: &self.cvv,
            agree_terms: self.agree_terms,
        }
    }

    #[must_use]
    pub fn validate(&self, ctx: &ValidationContext<'_>) -> Validation {
        validate_payment(&self.input(), ctx)
    }

    /// Store card input, regrouped as typed.
    pub fn set_card_number(&mut self, raw: &str) {
        self.card_number = format_card_number(raw);
    }

    /// Store expiry input, slash inserted as typed.
    pub fn set_expiry_date(&mut self, raw: &str) {
        self.expiry_date = format_expiry(raw);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("booking details are invalid")]
    Invalid(Validation),
    #[error("no booking is ready for checkout")]
    NotReady,
    #[error("could not save booking: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SubmitError {
    /// Form-level message for the page, if this failure shows one.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Storage(_) => Some(SUBMIT_FAILURE_MESSAGE),
            Self::Invalid(_) | Self::NotReady => None,
        }
    }
}

/// Synthesize a short booking reference such as `UK-7QX2MD`.
pub fn generate_reference<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    let code: String = (0..REFERENCE_LEN)
        .map(|_| char::from(REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())]))
        .collect();
    format!("{prefix}-{code}")
}

/// Confirm the booking in progress.
///
/// On success the record gains its reference, moves to the completed slot,
/// and the in-progress slot is erased.
///
/// # Errors
///
/// Returns [`SubmitError::Invalid`] when the form fails validation (no
/// reference is generated and nothing is written), [`SubmitError::NotReady`]
/// when there is no priced booking to confirm, and [`SubmitError::Storage`]
/// when the completed booking cannot be persisted.
pub fn submit_booking<S, R>(
    store: &BookingStore<S>,
    form: &PaymentForm,
    ctx: &ValidationContext<'_>,
    reference_prefix: &str,
    rng: &mut R,
) -> Result<BookingRecord, SubmitError>
where
    S: KeyValueStore,
    R: Rng + ?Sized,
{
    let validation = form.validate(ctx);
    if !validation.valid() {
        return Err(SubmitError::Invalid(validation));
    }
    let mut record = store
        .load()
        .filter(|record| can_enter(Step::Payment, record))
        .ok_or(SubmitError::NotReady)?;
    if record.reference.is_none() {
        record.reference = Some(generate_reference(reference_prefix, rng));
    }
    store.complete(&record).map_err(|err| {
        log::error!("booking submission failed: {err}");
        SubmitError::Storage(Box::new(err))
    })?;
    log::info!(
        "booking {} confirmed",
        record.reference.as_deref().unwrap_or_default()
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::record::ServiceType;
    use crate::store::{COMPLETED_KEY, MemoryStore};
    use crate::validate::Field;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn priced_record() -> BookingRecord {
        BookingRecord {
            collection_address: Some("1 High Street".into()),
            collection_postcode: Some("LS1 1AA".into()),
            delivery_address: Some("2 Low Road".into()),
            delivery_postcode: Some("YO1 1AA".into()),
            date: NaiveDate::from_ymd_opt(2026, 10, 20),
            time: Some("10:00".into()),
            vehicle: Some("medium_van".into()),
            vehicle_name: Some("Medium Van".into()),
            vehicle_base_price: Some(65),
            hours: Some(4),
            base_price: Some(65),
            total_hours_price: Some(260),
            total_price: Some(260),
            ..BookingRecord::with_service(ServiceType::Residential)
        }
    }

    fn form() -> PaymentForm {
        PaymentForm {
            full_name: "Sam Taylor".into(),
            email: "sam@example.com".into(),
            phone: "07700900123".into(),
            card_number: "4111 1111 1111 1111".into(),
            expiry_date: "11/28".into(),
            cvv: "321".into(),
            agree_terms: true,
        }
    }

    #[test]
    fn references_are_prefixed_base36_codes() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let reference = generate_reference("UK", &mut rng);
        assert_eq!(reference.len(), 9);
        assert!(reference.starts_with("UK-"));
        assert!(
            reference[3..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        let mut again = ChaCha20Rng::seed_from_u64(7);
        assert_eq!(generate_reference("UK", &mut again), reference);
    }

    #[test]
    fn successful_submission_moves_record_to_completed_slot() {
        let catalog = Catalog::empty();
        let ctx = ValidationContext::new(today(), &catalog);
        let backend = MemoryStore::new();
        let store = BookingStore::new(backend.clone());
        store.save(&priced_record()).unwrap();

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let done = submit_booking(&store, &form(), &ctx, "UK", &mut rng).unwrap();
        assert!(done.reference.is_some());
        assert_eq!(store.load(), None);
        assert_eq!(store.load_completed(), Some(done));
    }

    #[test]
    fn unchecked_terms_block_submission() {
        let catalog = Catalog::empty();
        let ctx = ValidationContext::new(today(), &catalog);
        let backend = MemoryStore::new();
        let store = BookingStore::new(backend.clone());
        store.save(&priced_record()).unwrap();

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let input = PaymentForm {
            agree_terms: false,
            ..form()
        };
        let err = submit_booking(&store, &input, &ctx, "UK", &mut rng).unwrap_err();
        let SubmitError::Invalid(validation) = err else {
            panic!("expected validation failure");
        };
        assert!(validation.field_errors.contains(Field::AgreeTerms));
        assert_eq!(store.load(), Some(priced_record()));
        assert_eq!(backend.raw(COMPLETED_KEY), None);
    }

    #[test]
    fn unpriced_booking_is_not_ready() {
        let catalog = Catalog::empty();
        let ctx = ValidationContext::new(today(), &catalog);
        let store = BookingStore::new(MemoryStore::new());
        store
            .save(&BookingRecord::with_service(ServiceType::Business))
            .unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let err = submit_booking(&store, &form(), &ctx, "UK", &mut rng).unwrap_err();
        assert!(matches!(err, SubmitError::NotReady));
        assert_eq!(err.notice(), None);
    }

    #[derive(Debug, thiserror::Error)]
    #[error("quota exceeded")]
    struct QuotaExceeded;

    /// Reads from memory, refuses every write.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        type Error = QuotaExceeded;

        fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error> {
            Ok(self.0.raw(key))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), Self::Error> {
            Err(QuotaExceeded)
        }

        fn remove_item(&self, _key: &str) -> Result<(), Self::Error> {
            Err(QuotaExceeded)
        }
    }

    #[test]
    fn storage_failures_keep_their_cause_behind_a_generic_notice() {
        use std::error::Error as _;

        let catalog = Catalog::empty();
        let ctx = ValidationContext::new(today(), &catalog);
        let backend = MemoryStore::new();
        BookingStore::new(backend.clone())
            .save(&priced_record())
            .unwrap();
        let store = BookingStore::new(ReadOnlyStore(backend));

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let err = submit_booking(&store, &form(), &ctx, "UK", &mut rng).unwrap_err();
        assert_eq!(err.notice(), Some(SUBMIT_FAILURE_MESSAGE));
        let cause = err.source().expect("storage error keeps its source");
        assert!(cause.to_string().contains("quota exceeded"));
        assert_eq!(store.load(), Some(priced_record()));
    }

    #[test]
    fn typed_card_and_expiry_are_formatted() {
        let mut form = PaymentForm::default();
        form.set_card_number("4111111111111111");
        form.set_expiry_date("0529");
        assert_eq!(form.card_number, "4111 1111 1111 1111");
        assert_eq!(form.expiry_date, "05/29");
    }
}
