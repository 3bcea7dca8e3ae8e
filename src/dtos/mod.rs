pub mod conversation;
pub mod dashboard;
pub mod investment;
pub mod project;
pub mod user;
pub mod wallet;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Success body for endpoints with nothing else to return.
#[derive(Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: &'static str,
}

impl Ack {
    pub fn ok(message: &'static str) -> Self {
        Self { success: true, message }
    }
}

/// Mobile forms send numbers either as JSON numbers or as the raw text field.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => n.as_f64(),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Number(n)) => n.as_i64(),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Trimmed, non-empty value or None.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date pickers send the latter).
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Largest value a `NUMERIC(14,2)` money column can hold.
pub const MAX_MONEY: f64 = 999_999_999_999.99;

/// Rounded to cents (money columns hold two decimals), finite and strictly positive.
pub(crate) fn positive_amount(value: Option<f64>) -> Option<f64> {
    value
        .map(|v| (v * 100.0).round() / 100.0)
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_f64")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "lenient_i64")]
        id: Option<i64>,
    }

    #[test]
    fn lenient_numbers_accept_text_and_numbers() {
        let p: Probe = serde_json::from_str(r#"{"amount": "12.5", "id": "7"}"#).unwrap();
        assert_eq!(p.amount, Some(12.5));
        assert_eq!(p.id, Some(7));

        let p: Probe = serde_json::from_str(r#"{"amount": 3, "id": 8}"#).unwrap();
        assert_eq!(p.amount, Some(3.0));
        assert_eq!(p.id, Some(8));

        let p: Probe = serde_json::from_str(r#"{"amount": "abc"}"#).unwrap();
        assert_eq!(p.amount, None);
        assert_eq!(p.id, None);
    }

    #[test]
    fn parses_plain_and_timestamp_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(parse_date("2025-03-14"), Some(expected));
        assert_eq!(parse_date("2025-03-14T08:00:00.000Z"), Some(expected));
        assert_eq!(parse_date("14/03/2025"), None);
    }

    #[test]
    fn positive_amount_rejects_zero_negative_and_nan() {
        assert_eq!(positive_amount(Some(10.0)), Some(10.0));
        assert_eq!(positive_amount(Some(10.456)), Some(10.46));
        assert_eq!(positive_amount(Some(0.004)), None);
        assert_eq!(positive_amount(Some(0.0)), None);
        assert_eq!(positive_amount(Some(-1.0)), None);
        assert_eq!(positive_amount(Some(f64::NAN)), None);
        assert_eq!(positive_amount(Some(f64::INFINITY)), None);
        // Finite on input, infinite once scaled to cents
        assert_eq!(positive_amount(Some(1e308)), None);
        assert_eq!(positive_amount(None), None);
    }
}
