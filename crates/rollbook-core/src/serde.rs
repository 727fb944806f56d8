use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Accepts a missing value, an empty string or a `YYYY-MM-DD` date.
///
/// Browsers submit untouched date inputs as `""`, which plain `Option<NaiveDate>`
/// rejects.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Same leniency as [`deserialize_optional_date`] for free-text fields.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        from: Option<NaiveDate>,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        session: Option<String>,
    }

    #[test]
    fn test_empty_values_become_none() {
        let q: Query = serde_json::from_str(r#"{"from": "", "session": " "}"#).unwrap();
        assert!(q.from.is_none());
        assert!(q.session.is_none());

        let q: Query = serde_json::from_str("{}").unwrap();
        assert!(q.from.is_none());
    }

    #[test]
    fn test_dates_are_parsed() {
        let q: Query =
            serde_json::from_str(r#"{"from": "2025-09-15", "session": "2024/2025"}"#).unwrap();
        assert_eq!(q.from, NaiveDate::from_ymd_opt(2025, 9, 15));
        assert_eq!(q.session.as_deref(), Some("2024/2025"));

        assert!(serde_json::from_str::<Query>(r#"{"from": "15/09/2025"}"#).is_err());
    }
}
