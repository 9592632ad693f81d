use removals_booking::Step;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub step: Step,
    #[prop_or_default]
    pub subtitle: AttrValue,
}

/// Step title with the wizard progress bar.
#[function_component(StepHeader)]
pub fn step_header(p: &Props) -> Html {
    let percent = p.step.progress_percent();
    html! {
        <header class="step-header">
            <p class="step-count">{ format!("Step {} of {}", p.step.number(), Step::COUNT) }</p>
            <h1>{ format!("Step {}: {}", p.step.number(), p.step.title()) }</h1>
            if !p.subtitle.is_empty() {
                <p class="step-subtitle">{ p.subtitle.clone() }</p>
            }
            <div class="progress" role="progressbar"
                aria-valuemin="0" aria-valuemax="100" aria-valuenow={format!("{percent:.0}")}>
                <div class="progress-fill" style={format!("width: {percent:.2}%")}></div>
            </div>
        </header>
    }
}
