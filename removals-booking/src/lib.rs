//! Removals Booking Engine
//!
//! Platform-agnostic core of the six-step removals booking wizard.
//! This crate provides the booking record, step guards, validation, pricing
//! and mock checkout without UI or platform-specific dependencies.

pub mod catalog;
pub mod config;
pub mod numbers;
pub mod pricing;
pub mod record;
pub mod routing;
pub mod store;
pub mod submission;
pub mod validate;
pub mod wizard;

use chrono::NaiveDate;
use rand::Rng;

// Re-export commonly used types
pub use catalog::{AddOn, Catalog, TimeSlot, Vehicle};
pub use config::{AddressEntry, MapsConfig, WizardConfig};
pub use pricing::{AddOnSelection, Hours, Quote, hours_price, quote, reprice};
pub use record::{
    AddressInput, BookingRecord, Endpoint, RECORD_VERSION, RecordField, SelectedAddOn,
    ServiceType,
};
pub use routing::{
    AddressComponent, FixedRoutes, PlaceSelection, RouteLookup, RoutePair, RouteResolver,
    RouteResult, RouteStatus, extract_postcode,
};
pub use store::{BookingStore, COMPLETED_KEY, IN_PROGRESS_KEY, KeyValueStore, MemoryStore, StoreError};
pub use submission::{
    PaymentForm, SUBMIT_FAILURE_MESSAGE, SubmitError, generate_reference, submit_booking,
};
pub use validate::{Field, FieldErrors, Validation, ValidationContext};
pub use wizard::{
    DetailsForm, Entry, ExtrasForm, HoursForm, Refusal, ServiceForm, Stage, Step, StepForm,
    Transition, VehicleForm, advance, can_enter, resolve_entry,
};

#[derive(Debug, thiserror::Error)]
pub enum StepError<E>
where
    E: std::error::Error + 'static,
{
    /// An earlier step is incomplete; the caller should send the user there.
    #[error("{0} must be completed first")]
    NotReady(Step),
    #[error("step inputs are invalid")]
    Invalid(Validation),
    #[error(transparent)]
    Store(#[from] StoreError<E>),
}

impl<E> From<Refusal> for StepError<E>
where
    E: std::error::Error + 'static,
{
    fn from(refusal: Refusal) -> Self {
        match refusal {
            Refusal::NotReady(step) => Self::NotReady(step),
            Refusal::Invalid(validation) => Self::Invalid(validation),
        }
    }
}

/// Main booking engine tying the store, catalog and configuration together
pub struct BookingEngine<S>
where
    S: KeyValueStore,
{
    store: BookingStore<S>,
    catalog: Catalog,
    config: WizardConfig,
}

impl<S> BookingEngine<S>
where
    S: KeyValueStore,
{
    /// Create an engine over the provided storage backend
    pub const fn new(backend: S, catalog: Catalog, config: WizardConfig) -> Self {
        Self {
            store: BookingStore::new(backend),
            catalog,
            config,
        }
    }

    pub const fn store(&self) -> &BookingStore<S> {
        &self.store
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub const fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// The booking in progress, if any.
    #[must_use]
    pub fn current(&self) -> Option<BookingRecord> {
        self.store.load()
    }

    /// The last confirmed booking, if any.
    #[must_use]
    pub fn completed(&self) -> Option<BookingRecord> {
        self.store.load_completed()
    }

    /// Guard a visit to `step` against the stored booking.
    #[must_use]
    pub fn enter(&self, step: Step, query: Option<&str>) -> Entry {
        resolve_entry(step, query, self.current().as_ref())
    }

    /// Validate a step form, persist the updated record and report where to
    /// go next.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::NotReady`] when an earlier step is incomplete,
    /// [`StepError::Invalid`] when the form fails validation (neither writes
    /// anything), or [`StepError::Store`] when the record cannot be saved.
    pub fn continue_step<F: StepForm>(
        &self,
        form: &F,
        today: NaiveDate,
    ) -> Result<Stage, StepError<S::Error>> {
        let record = self.current().unwrap_or_default();
        let ctx = ValidationContext::new(today, &self.catalog);
        let transition = advance(&record, form, &ctx)?;
        self.store.save(&transition.record)?;
        Ok(transition.next)
    }

    /// Run the mock checkout for the booking in progress.
    ///
    /// # Errors
    ///
    /// See [`submit_booking`].
    pub fn submit<R: Rng + ?Sized>(
        &self,
        form: &PaymentForm,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<BookingRecord, SubmitError> {
        let ctx = ValidationContext::new(today, &self.catalog);
        submit_booking(
            &self.store,
            form,
            &ctx,
            &self.config.reference_prefix,
            rng,
        )
    }
}
