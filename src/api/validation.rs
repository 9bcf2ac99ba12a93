use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;

use super::ApiError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Trimmed, non-empty text or a validation error with `msg`.
pub fn required(value: Option<String>, msg: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(msg))
}

/// Present and non-zero. Zero counts as missing, as does an absent field.
pub fn required_number(value: Option<i32>, msg: &str) -> Result<i32, ApiError> {
    value.filter(|v| *v != 0).ok_or_else(|| ApiError::validation(msg))
}

/// Blank strings collapse to `None`.
#[must_use]
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn validate_email(correo: &str) -> Result<&str, ApiError> {
    if EMAIL_RE.is_match(correo) {
        Ok(correo)
    } else {
        Err(ApiError::validation("Correo con formato inválido"))
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part (`2001-05-17T00:00:00Z`).
pub fn parse_optional_date(value: Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    let Some(raw) = optional_text(value) else {
        return Ok(None);
    };

    let date_part = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApiError::validation("FechaNacimiento debe tener formato AAAA-MM-DD"))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<N> {
    Number(N),
    Text(String),
}

/// Form front-ends often send numbers as strings. Accepts `4`, `"4"`, `null` and `""`.
pub fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText<i32>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: {s}"))),
    }
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText<f64>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "lenient_i32")]
        n: Option<i32>,
        #[serde(default, deserialize_with = "lenient_f64")]
        monto: Option<f64>,
    }

    fn parse(json: &str) -> Result<Body, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_required() {
        assert_eq!(required(Some("  Ana ".into()), "x").unwrap(), "Ana");
        assert!(required(Some("   ".into()), "x").is_err());
        assert!(required(None, "x").is_err());
    }

    #[test]
    fn test_required_number_treats_zero_as_missing() {
        assert_eq!(required_number(Some(3), "x").unwrap(), 3);
        assert!(required_number(Some(0), "x").is_err());
        assert!(required_number(None, "x").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("admin@academia.local").is_ok());
        assert!(validate_email("a@x").is_err());
        assert!(validate_email("no-at.com").is_err());
        assert!(validate_email("a b@x.com").is_err());
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some(String::new())).unwrap(), None);
        assert_eq!(
            parse_optional_date(Some("2001-05-17T00:00:00.000Z".into())).unwrap(),
            NaiveDate::from_ymd_opt(2001, 5, 17)
        );
        assert!(parse_optional_date(Some("17/05/2001".into())).is_err());
    }

    #[test]
    fn test_lenient_numbers() {
        let body = parse(r#"{"n": "42", "monto": "12.5"}"#).unwrap();
        assert_eq!(body.n, Some(42));
        assert_eq!(body.monto, Some(12.5));

        let body = parse(r#"{"n": 7, "monto": 3}"#).unwrap();
        assert_eq!(body.n, Some(7));
        assert_eq!(body.monto, Some(3.0));

        let body = parse(r#"{"n": "", "monto": null}"#).unwrap();
        assert_eq!(body.n, None);
        assert_eq!(body.monto, None);

        let body = parse("{}").unwrap();
        assert_eq!(body.n, None);

        assert!(parse(r#"{"n": "abc"}"#).is_err());
    }
}
