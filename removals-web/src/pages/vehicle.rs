use removals_booking::{Step, Vehicle};
use yew::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::step_header::StepHeader;
use crate::{format, paths};

#[derive(Properties, Clone, PartialEq)]
pub struct VehiclePageProps {
    pub vehicles: Vec<Vehicle>,
    pub selected: Option<String>,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    pub on_select: Callback<String>,
    pub on_continue: Callback<()>,
    pub on_back: Callback<()>,
}

#[function_component(VehiclePage)]
pub fn vehicle_page(props: &VehiclePageProps) -> Html {
    let cards = props.vehicles.iter().map(|vehicle| {
        let checked = props.selected.as_deref() == Some(vehicle.id.as_str());
        let onclick = {
            let cb = props.on_select.clone();
            let id = vehicle.id.clone();
            Callback::from(move |_| cb.emit(id.clone()))
        };
        html! {
            <button
                type="button"
                role="radio"
                aria-checked={checked.to_string()}
                class={classes!("vehicle-card", checked.then_some("selected"))}
                {onclick}
                data-testid={format!("vehicle-{}", vehicle.id)}
            >
                <img src={paths::asset_path(&vehicle.image)} alt={vehicle.name.clone()} />
                <h3>{ vehicle.name.clone() }</h3>
                <p class="vehicle-description">{ vehicle.description.clone() }</p>
                <ul class="vehicle-specs">
                    <li>{ format!("Capacity: {}", vehicle.capacity) }</li>
                    <li>{ format!("Max weight: {}", vehicle.max_weight) }</li>
                </ul>
                <p class="vehicle-rate">{ format::rate(vehicle.base_price) }</p>
            </button>
        }
    });

    let on_back = props.on_back.clone();
    let on_continue = props.on_continue.clone();

    html! {
        <section class="panel step step-vehicle" data-testid="step-3">
            <StepHeader step={Step::Vehicle} subtitle="Pick the van that fits your move" />
            <div class="vehicle-grid" role="radiogroup" aria-label={Step::Vehicle.title()}>
                { for cards }
            </div>
            <FieldError message={props.error.clone()} />
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
