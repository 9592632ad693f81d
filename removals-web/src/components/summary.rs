use removals_booking::BookingRecord;
use yew::prelude::*;

use crate::format;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub record: BookingRecord,
    #[prop_or_default]
    pub title: Option<AttrValue>,
    /// Include the collection/delivery postcodes and route figures.
    #[prop_or_default]
    pub show_route: bool,
}

fn row(label: &'static str, value: String) -> Html {
    html! {
        <p class="summary-row"><span class="summary-label">{ label }{ ":" }</span>{ " " }{ value }</p>
    }
}

/// Read-only recap of the booking so far.
#[function_component(BookingSummary)]
pub fn booking_summary(p: &Props) -> Html {
    let r = &p.record;
    let title = p
        .title
        .clone()
        .unwrap_or_else(|| AttrValue::from("Your Booking Summary"));
    html! {
        <section class="booking-summary" aria-label={title.clone()}>
            <h3>{ title }</h3>
            { row("Service Type", r.service_type.map_or_else(|| "Not specified".to_string(), |s| s.label().to_string())) }
            { row("Vehicle", format::or_unspecified(r.vehicle_name.as_deref())) }
            if let Some(hours) = r.hours {
                { row("Duration", format::hours(hours)) }
            }
            { row("Date", r.date.map_or_else(|| "Not specified".to_string(), format::date)) }
            { row("Time", format::or_unspecified(r.time.as_deref())) }
            if p.show_route {
                { row("Collection", format::or_unspecified(r.collection_postcode.as_deref())) }
                { row("Delivery", format::or_unspecified(r.delivery_postcode.as_deref())) }
                if r.distance > 0.0 {
                    { row("Distance", format::miles(r.distance)) }
                }
            }
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use futures::executor::block_on;
    use removals_booking::ServiceType;
    use yew::LocalServerRenderer;

    #[test]
    fn lists_known_fields_and_placeholders() {
        let mut record = BookingRecord::with_service(ServiceType::Business);
        record.date = NaiveDate::from_ymd_opt(2026, 10, 20);
        record.hours = Some(5);
        record.delivery_postcode = Some("YO1 1AA".into());
        let props = Props {
            record,
            title: None,
            show_route: true,
        };
        let html = block_on(LocalServerRenderer::<BookingSummary>::with_props(props).render());
        assert!(html.contains("Business Removals"));
        assert!(html.contains("20/10/2026"));
        assert!(html.contains("5 hours"));
        assert!(html.contains("YO1 1AA"));
        assert!(html.contains("Not specified"));
        assert!(!html.contains("Distance"));
    }
}
