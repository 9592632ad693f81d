use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub on_go_home: Callback<()>,
}

#[function_component(NotFound)]
pub fn not_found(props: &Props) -> Html {
    let go_home = {
        let cb = props.on_go_home.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <section class="panel not-found" aria-live="assertive" data-testid="not-found">
            <h1>{ "Page not found" }</h1>
            <p>{ "That page is not part of the booking process." }</p>
            <button type="button" class="btn btn-primary" onclick={go_home}>
                { "Start a new booking" }
            </button>
        </section>
    }
}
