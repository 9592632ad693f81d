use removals_booking::{ServiceType, Step};
use yew::prelude::*;

use crate::components::field_error::FieldError;
use crate::components::step_header::StepHeader;

#[derive(Properties, Clone, PartialEq)]
pub struct ServicePageProps {
    pub selected: Option<ServiceType>,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    pub on_select: Callback<ServiceType>,
    pub on_continue: Callback<()>,
    pub on_back: Callback<()>,
}

const fn summary(service: ServiceType) -> &'static str {
    match service {
        ServiceType::Residential => "House moves, flats and student relocations",
        ServiceType::Business => "Office, shop and commercial relocations",
    }
}

#[function_component(ServicePage)]
pub fn service_page(props: &ServicePageProps) -> Html {
    let options = ServiceType::ALL.iter().map(|service| {
        let service = *service;
        let checked = props.selected == Some(service);
        let onclick = {
            let cb = props.on_select.clone();
            Callback::from(move |_| cb.emit(service))
        };
        html! {
            <button
                type="button"
                role="radio"
                aria-checked={checked.to_string()}
                class={classes!("option-card", checked.then_some("selected"))}
                {onclick}
                data-testid={format!("service-{}", service.as_str())}
            >
                <h3>{ service.label() }</h3>
                <p>{ summary(service) }</p>
            </button>
        }
    });

    let on_back = props.on_back.clone();
    let on_continue = props.on_continue.clone();

    html! {
        <section class="panel step step-service" data-testid="step-1">
            <StepHeader step={Step::Service} subtitle="What kind of move are you planning?" />
            <div class="option-grid" role="radiogroup" aria-label={Step::Service.title()}>
                { for options }
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
