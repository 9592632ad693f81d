use crate::router::{Route, StepQuery};
use removals_booking::{BookingRecord, Entry, Stage, Step, resolve_entry};

/// Where a visit to `step` must be sent instead, if anywhere.
///
/// Redirects keep the service type of the stored booking (or of the
/// incoming query) so the target step sees a valid `?type=`.
#[must_use]
pub fn redirect_for(
    step: Step,
    query: &StepQuery,
    record: Option<&BookingRecord>,
) -> Option<(Route, StepQuery)> {
    match resolve_entry(step, query.service.as_deref(), record) {
        Entry::Enter => None,
        Entry::Redirect(target) => {
            let service = record
                .and_then(|r| r.service_type)
                .or_else(|| query.service_type());
            Some((Route::from_step(target), StepQuery::for_service(service)))
        }
    }
}

/// Route to open after a step succeeds. `None` once the booking is complete.
#[must_use]
pub fn route_after(stage: Stage) -> Option<Route> {
    match stage {
        Stage::At(step) => Some(Route::from_step(step)),
        Stage::Completed => None,
    }
}

/// Route behind a step's back link.
#[must_use]
pub fn route_back(step: Step) -> Route {
    step.back().map_or(Route::Home, Route::from_step)
}
