use removals_booking::{AddressEntry, PlaceSelection};
use yew::prelude::*;

use super::field_error::FieldError;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub id: AttrValue,
    pub label: AttrValue,
    pub placeholder: AttrValue,
    pub value: AttrValue,
    pub entry: AddressEntry,
    /// Country the autocomplete is restricted to.
    #[prop_or_else(|| AttrValue::from("gb"))]
    pub country: AttrValue,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    pub on_input: Callback<String>,
    pub on_place: Callback<PlaceSelection>,
}

/// Address input, upgraded to Places autocomplete when a key is configured.
///
/// The input stays disabled while the autocomplete script loads and is
/// re-enabled whether or not loading succeeds.
#[function_component(AddressField)]
pub fn address_field(p: &Props) -> Html {
    let input_ref = use_node_ref();
    let ready = use_state(|| p.entry == AddressEntry::FreeText);

    #[cfg(target_arch = "wasm32")]
    {
        let input_ref = input_ref.clone();
        let ready = ready.clone();
        let on_place = p.on_place.clone();
        let country = p.country.to_string();
        use_effect_with(p.entry, move |entry| {
            if *entry == AddressEntry::Autocomplete {
                wasm_bindgen_futures::spawn_local(async move {
                    let key = crate::paths::maps_config().usable_key().map(str::to_string);
                    let loaded = match key {
                        Some(key) => crate::maps::load(&key).await,
                        None => Err(wasm_bindgen::JsValue::from_str("no maps key")),
                    };
                    let attached = loaded.and_then(|()| {
                        let input = input_ref
                            .cast::<web_sys::HtmlInputElement>()
                            .ok_or_else(|| wasm_bindgen::JsValue::from_str("address input not mounted"))?;
                        crate::maps::attach_autocomplete(&input, &country, move |place| {
                            on_place.emit(place);
                        })
                    });
                    if let Err(err) = attached {
                        crate::dom::console_error(&format!(
                            "Error initializing Google Places Autocomplete: {}",
                            crate::dom::js_error_message(&err)
                        ));
                    }
                    ready.set(true);
                });
            }
        });
    }

    let oninput = {
        let cb = p.on_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                cb.emit(input.value());
            }
        })
    };

    let class = if p.error.is_some() {
        "input input-error"
    } else {
        "input"
    };
    html! {
        <div class="form-field">
            <label for={p.id.clone()}>{ p.label.clone() }</label>
            <input
                ref={input_ref}
                type="text"
                id={p.id.clone()}
                name={p.id.clone()}
                class={class}
                value={p.value.clone()}
                placeholder={p.placeholder.clone()}
                autocomplete="off"
                disabled={!*ready}
                {oninput}
            />
            <FieldError message={p.error.clone()} />
        </div>
    }
}
