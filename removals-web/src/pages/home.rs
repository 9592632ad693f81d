use removals_booking::{ServiceType, Step};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HomePageProps {
    pub on_start: Callback<ServiceType>,
}

const BENEFITS: [&str; 6] = [
    "Professional & experienced staff",
    "Fully insured service",
    "Transparent pricing",
    "Nationwide coverage",
    "Flexible scheduling",
    "Secure handling of belongings",
];

const fn blurb(service: ServiceType) -> &'static str {
    match service {
        ServiceType::Residential => {
            "Moving to a new home? We offer comprehensive house removal services to make your move stress-free."
        }
        ServiceType::Business => {
            "Relocating your office? Our business removal services ensure minimal disruption to your operations."
        }
    }
}

#[function_component(HomePage)]
pub fn home_page(props: &HomePageProps) -> Html {
    let cards = ServiceType::ALL.iter().map(|service| {
        let service = *service;
        let onclick = {
            let cb = props.on_start.clone();
            Callback::from(move |_| cb.emit(service))
        };
        html! {
            <article class="service-card" data-service={service.as_str()}>
                <h3>{ service.label() }</h3>
                <p>{ blurb(service) }</p>
                <button type="button" class="btn btn-primary" {onclick}>
                    { format!("Book {}", service.label().trim_end_matches('s')) }
                </button>
            </article>
        }
    });

    html! {
        <section class="home" data-testid="home-screen">
            <div class="hero">
                <h1>{ "UK Removals Booking Service" }</h1>
                <p>{ "Professional House & Office Removals Services" }</p>
            </div>
            <h2>{ "Book Your Removal Service in 6 Simple Steps" }</h2>
            <div class="service-cards">{ for cards }</div>
            <div class="benefits">
                <h3>{ "Why Choose Our Removal Services?" }</h3>
                <ul>
                    { for BENEFITS.iter().map(|b| html! { <li>{ *b }</li> }) }
                </ul>
            </div>
            <ol class="process">
                { for Step::ALL.iter().map(|step| html! {
                    <li><span class="step-badge">{ step.number() }</span>{ step.title() }</li>
                }) }
            </ol>
        </section>
    }
}
