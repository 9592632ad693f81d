//! Display strings for prices, dates and route figures.
use chrono::NaiveDate;

#[must_use]
pub fn price(pounds: u32) -> String {
    format!("£{pounds}")
}

/// Per-hour rate, e.g. `£65/hour`.
#[must_use]
pub fn rate(pounds: u32) -> String {
    format!("£{pounds}/hour")
}

/// `en-GB` short date.
#[must_use]
pub fn date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Value for an `<input type="date">`.
#[must_use]
pub fn date_input(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[must_use]
pub fn hours(hours: u32) -> String {
    if hours == 1 {
        "1 hour".to_string()
    } else {
        format!("{hours} hours")
    }
}

#[must_use]
pub fn miles(distance: f64) -> String {
    format!("{distance:.1} miles")
}

#[must_use]
pub fn minutes(duration: u32) -> String {
    format!("{duration} minutes")
}

/// Fallback text for optional summary values.
#[must_use]
pub fn or_unspecified(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("Not specified")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_summary_values() {
        assert_eq!(price(325), "£325");
        assert_eq!(rate(65), "£65/hour");
        let day = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        assert_eq!(date(day), "20/10/2026");
        assert_eq!(date_input(day), "2026-10-20");
        assert_eq!(hours(4), "4 hours");
        assert_eq!(miles(24.9), "24.9 miles");
        assert_eq!(minutes(46), "46 minutes");
        assert_eq!(or_unspecified(Some(" ")), "Not specified");
        assert_eq!(or_unspecified(Some("10:00")), "10:00");
    }
}
