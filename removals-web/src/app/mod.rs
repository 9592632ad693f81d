//! Application shell: router, step guards and per-step state.
#[cfg(target_arch = "wasm32")]
use crate::router::Route;
use crate::storage::LocalStorage;
use once_cell::sync::Lazy;
use removals_booking::{BookingEngine, Catalog, WizardConfig};
#[cfg(target_arch = "wasm32")]
use yew::prelude::*;
#[cfg(target_arch = "wasm32")]
use yew_router::prelude::*;

pub mod details;
pub mod guard;
pub mod payment;
#[cfg(target_arch = "wasm32")]
mod steps;

static CATALOG: Lazy<Catalog> = Lazy::new(|| {
    Catalog::load_from_static().unwrap_or_else(|err| {
        log::error!("embedded catalog failed to parse: {err}");
        Catalog::empty()
    })
});

static CONFIG: Lazy<WizardConfig> = Lazy::new(|| {
    WizardConfig::load_from_static().unwrap_or_else(|err| {
        log::warn!("embedded wizard configuration failed to parse, using defaults: {err}");
        WizardConfig::default()
    })
});

/// The offered vehicles, add-ons and time slots.
#[must_use]
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

/// Booking engine over the browser's `localStorage`.
#[must_use]
pub fn engine() -> BookingEngine<LocalStorage> {
    BookingEngine::new(LocalStorage, CATALOG.clone(), CONFIG.clone())
}

/// Main application component providing browser routing
#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::paths::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <main id="main" class="booking-app">
                <Switch<Route> render={switch} />
            </main>
        </BrowserRouter>
    }
}

#[cfg(target_arch = "wasm32")]
fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <steps::HomeView /> },
        Route::Step1 => html! { <steps::ServiceStep /> },
        Route::Step2 => html! { <steps::DetailsStep /> },
        Route::Step3 => html! { <steps::VehicleStep /> },
        Route::Step4 => html! { <steps::HoursStep /> },
        Route::Step5 => html! { <steps::ExtrasStep /> },
        Route::Step6 => html! { <steps::PaymentStep /> },
        Route::NotFound => html! { <steps::NotFoundView /> },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_is_available() {
        assert_eq!(catalog().vehicles.len(), 4);
        assert_eq!(catalog().add_ons.len(), 5);
    }

    #[test]
    fn engine_uses_the_shipped_configuration() {
        assert_eq!(engine().config().submit_latency_ms, 2000);
        assert_eq!(engine().config().hour_bounds(), (2, 12));
    }
}
