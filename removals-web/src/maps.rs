//! Google Maps adapter: script loading, Places autocomplete and the
//! Distance Matrix route resolver.
use async_trait::async_trait;
use js_sys::{Array, Function, Promise, Reflect};
use removals_booking::{
    AddressComponent, PlaceSelection, RouteResolver, RouteResult, RouteStatus, extract_postcode,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlInputElement, HtmlScriptElement};

use crate::dom;

const SCRIPT_ID: &str = "google-maps-script";
const PLACE_FIELDS: [&str; 4] = [
    "address_components",
    "formatted_address",
    "place_id",
    "geometry",
];
/// `google.maps.UnitSystem.IMPERIAL`
const UNIT_SYSTEM_IMPERIAL: u8 = 1;

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn missing(what: &str) -> JsValue {
    JsValue::from_str(&format!("{what} unavailable"))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn maps_namespace() -> Option<JsValue> {
    let google = get(dom::window().as_ref(), "google")?;
    get(&google, "maps")
}

fn constructor(namespace: &JsValue, name: &str) -> Result<Function, JsValue> {
    get(namespace, name)
        .ok_or_else(|| missing(name))?
        .dyn_into::<Function>()
}

/// Whether `google.maps.places` is available on the page.
#[must_use]
pub fn places_ready() -> bool {
    maps_namespace()
        .and_then(|maps| get(&maps, "places"))
        .is_some()
}

/// Inject the Maps script (once per page) and wait for it to load.
///
/// # Errors
/// Returns an error if the script cannot be added, fails to load, or loads
/// without the Places library.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn load(api_key: &str) -> Result<(), JsValue> {
    if places_ready() {
        return Ok(());
    }
    let document = dom::document();
    let script = match document.get_element_by_id(SCRIPT_ID) {
        Some(existing) => existing.dyn_into::<HtmlScriptElement>().map_err(JsValue::from)?,
        None => {
            let script = document
                .create_element("script")?
                .dyn_into::<HtmlScriptElement>()
                .map_err(JsValue::from)?;
            script.set_id(SCRIPT_ID);
            script.set_src(&format!(
                "https://maps.googleapis.com/maps/api/js?key={api_key}&libraries=places"
            ));
            script.set_async(true);
            document
                .head()
                .ok_or_else(|| missing("document head"))?
                .append_child(&script)?;
            script
        }
    };

    let promise = Promise::new(&mut |resolve, reject| {
        let _ = script.add_event_listener_with_callback("load", &resolve);
        let _ = script.add_event_listener_with_callback("error", &reject);
    });
    JsFuture::from(promise).await?;

    if places_ready() {
        Ok(())
    } else {
        Err(missing("google.maps.places"))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Restrictions<'a> {
    country: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AutocompleteOptions<'a> {
    component_restrictions: Restrictions<'a>,
    fields: [&'a str; 4],
}

#[derive(Deserialize)]
struct PlaceResult {
    formatted_address: Option<String>,
    place_id: Option<String>,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

fn read_place(autocomplete: &JsValue) -> Option<PlaceSelection> {
    let get_place = get(autocomplete, "getPlace")?.dyn_into::<Function>().ok()?;
    let place = get_place.call0(autocomplete).ok()?;
    let place: PlaceResult = serde_wasm_bindgen::from_value(place).ok()?;
    Some(PlaceSelection {
        postcode: extract_postcode(&place.address_components),
        formatted_address: place.formatted_address?,
        place_id: place.place_id,
    })
}

/// Turn an input into a Places autocomplete restricted to `country`.
///
/// # Errors
/// Returns an error if the Places library is missing or rejects the input.
pub fn attach_autocomplete(
    input: &HtmlInputElement,
    country: &str,
    on_select: impl Fn(PlaceSelection) + 'static,
) -> Result<(), JsValue> {
    let places = maps_namespace()
        .and_then(|maps| get(&maps, "places"))
        .ok_or_else(|| missing("google.maps.places"))?;
    let ctor = constructor(&places, "Autocomplete")?;
    let options = to_js(&AutocompleteOptions {
        component_restrictions: Restrictions { country },
        fields: PLACE_FIELDS,
    })?;
    let autocomplete = Reflect::construct(&ctor, &Array::of2(input.as_ref(), &options))?;

    let handle = autocomplete.clone();
    let listener = Closure::<dyn FnMut()>::new(move || {
        if let Some(selection) = read_place(&handle) {
            on_select(selection);
        }
    });
    let add_listener = get(&autocomplete, "addListener")
        .ok_or_else(|| missing("Autocomplete.addListener"))?
        .dyn_into::<Function>()?;
    add_listener.call2(
        &autocomplete,
        &JsValue::from_str("place_changed"),
        listener.as_ref().unchecked_ref(),
    )?;
    listener.forget();
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaceRef<'a> {
    place_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MatrixRequest<'a> {
    origins: [PlaceRef<'a>; 1],
    destinations: [PlaceRef<'a>; 1],
    travel_mode: &'static str,
    unit_system: u8,
}

#[derive(Deserialize)]
struct MatrixResponse {
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<Measure>,
    duration: Option<Measure>,
}

#[derive(Deserialize)]
struct Measure {
    value: f64,
}

#[allow(clippy::future_not_send)]
async fn distance_matrix(origin: &str, destination: &str) -> Result<RouteResult, JsValue> {
    let maps = maps_namespace().ok_or_else(|| missing("google.maps"))?;
    let service = Reflect::construct(&constructor(&maps, "DistanceMatrixService")?, &Array::new())?;
    let get_matrix = get(&service, "getDistanceMatrix")
        .ok_or_else(|| missing("DistanceMatrixService.getDistanceMatrix"))?
        .dyn_into::<Function>()?;
    let request = to_js(&MatrixRequest {
        origins: [PlaceRef { place_id: origin }],
        destinations: [PlaceRef {
            place_id: destination,
        }],
        travel_mode: "DRIVING",
        unit_system: UNIT_SYSTEM_IMPERIAL,
    })?;

    let promise = Promise::new(&mut |resolve, reject| {
        let callback = Closure::once_into_js(move |response: JsValue, status: JsValue| {
            let _ = resolve.call1(&JsValue::UNDEFINED, &Array::of2(&response, &status));
        });
        if let Err(err) = get_matrix.call2(&service, &request, &callback) {
            let _ = reject.call1(&JsValue::UNDEFINED, &err);
        }
    });
    let reply = Array::from(&JsFuture::from(promise).await?);

    let status = reply.get(1).as_string().unwrap_or_default();
    if status != "OK" {
        return Err(JsValue::from_str(&format!(
            "Distance Matrix request failed with status: {status}"
        )));
    }
    let response: MatrixResponse =
        serde_wasm_bindgen::from_value(reply.get(0)).map_err(JsValue::from)?;
    let element = response
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| missing("Distance Matrix element"))?;

    Ok(match (element.status.as_str(), element.distance, element.duration) {
        ("OK", Some(distance), Some(duration)) => {
            RouteResult::from_metric(distance.value, duration.value)
        }
        (status, _, _) => RouteResult::failed(RouteStatus::from_service(status)),
    })
}

/// Driving routes from the Distance Matrix service.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceMatrix;

#[async_trait(?Send)]
impl RouteResolver for DistanceMatrix {
    async fn resolve_route(&self, origin: &str, destination: &str) -> RouteResult {
        match distance_matrix(origin, destination).await {
            Ok(result) => result,
            Err(err) => {
                dom::console_error(&format!(
                    "Error calculating distance: {}",
                    dom::js_error_message(&err)
                ));
                RouteResult::failed(RouteStatus::Error)
            }
        }
    }
}
