use anyhow::{Context, Result};
use chrono::NaiveDate;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse a `--today` override, falling back to the local calendar date.
pub fn resolve_today(arg: Option<&str>) -> Result<NaiveDate> {
    arg.map_or_else(
        || Ok(chrono::Local::now().date_naive()),
        |raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .with_context(|| format!("--today must be YYYY-MM-DD, got {raw:?}"))
        },
    )
}

/// Parse the comma-separated `--seed` list.
pub fn parse_seeds(arg: &str) -> Result<Vec<u64>> {
    split_csv(arg)
        .iter()
        .map(|token| {
            token
                .parse::<u64>()
                .with_context(|| format!("invalid seed {token:?}"))
        })
        .collect()
}

pub mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_micros()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" happy-path, ,route-lookup,  terms-required ");
        assert_eq!(parts, vec!["happy-path", "route-lookup", "terms-required"]);
    }

    #[test]
    fn today_override_must_be_iso() {
        assert_eq!(
            resolve_today(Some("2026-10-14")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
        );
        assert!(resolve_today(Some("14/10/2026")).is_err());
        assert!(resolve_today(None).is_ok());
    }

    #[test]
    fn seeds_are_comma_separated_integers() {
        assert_eq!(parse_seeds("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_seeds("1,x").is_err());
    }
}
