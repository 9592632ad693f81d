use yew::prelude::*;

#[derive(Properties, PartialEq, Clone, Default)]
pub struct Props {
    #[prop_or_default]
    pub message: Option<AttrValue>,
}

/// Inline message under an invalid input; renders nothing when valid.
#[function_component(FieldError)]
pub fn field_error(p: &Props) -> Html {
    p.message.as_ref().map_or_else(Html::default, |message| {
        html! { <p class="field-error" role="alert">{ message.clone() }</p> }
    })
}

/// Page-level error lookup as an optional attribute value.
#[must_use]
pub fn message_for(
    errors: &removals_booking::FieldErrors,
    field: removals_booking::Field,
) -> Option<AttrValue> {
    errors.get(field).map(|m| AttrValue::from(m.to_string()))
}
