//! Lenient parsing of user-entered values
//!
//! Spreadsheet exports and form inputs arrive with locale formatting
//! ("€ 1.250,00", "15/03/2024", "sì"). These helpers are the single place
//! where such text is turned into typed values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Parse a decimal amount.
///
/// Everything except digits, `.`, `,` and `-` is stripped first. The last
/// separator is the decimal point and earlier ones are grouping, so
/// `1.250,00` and `1,250.00` both read 1250 while `1.125` stays 1.125. A
/// separator repeated with no other kind present (`1.000.000`) cannot be a
/// decimal point and is dropped.
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match cleaned.rfind(['.', ',']) {
        None => cleaned,
        Some(pos) => {
            let sep = &cleaned[pos..pos + 1];
            let (int_part, frac_part) = cleaned.split_at(pos);
            let int_part = int_part.replace(['.', ','], "");
            let grouping_only = cleaned.matches(sep).count() > 1
                && !cleaned.contains(if sep == "." { ',' } else { '.' });

            if grouping_only {
                cleaned.replace(sep, "")
            } else {
                format!("{int_part}.{}", &frac_part[1..])
            }
        }
    };

    Decimal::from_str(&normalized).ok()
}

/// Decimal from a JSON value.
///
/// Numbers convert exactly without going through the text rules; strings
/// use [`parse_decimal`]. Anything else is `None`.
pub fn json_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let raw = n.to_string();
            Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .ok()
        }
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Parse a date or timestamp into UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD`, `DD/MM/YYYY` and
/// `DD.MM.YYYY`. Date-only inputs resolve to midnight UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
        }
    }
    None
}

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`, `si/sì/no`)
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "si" | "sì" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// Serde adapters for DTO fields that accept lenient dates
pub mod de {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
    }

    /// Tell an omitted attribute (`None`) from an explicit `null` (`Some(None)`).
    /// Pair with `#[serde(default)]`.
    pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }

    pub fn datetime_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => super::parse_date(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_decimal_plain() {
        assert_eq!(parse_decimal("1250"), Some(dec("1250")));
        assert_eq!(parse_decimal("12.5"), Some(dec("12.5")));
        assert_eq!(parse_decimal("-3,75"), Some(dec("-3.75")));
    }

    #[test]
    fn test_parse_decimal_locale_formats() {
        assert_eq!(parse_decimal("€ 1.250,00"), Some(dec("1250.00")));
        assert_eq!(parse_decimal("$1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_decimal("1.000.000"), Some(dec("1000000")));
        assert_eq!(parse_decimal("0.125"), Some(dec("0.125")));
        assert_eq!(parse_decimal("12,50 EUR"), Some(dec("12.50")));
    }

    #[test]
    fn test_parse_decimal_single_separator_is_decimal_point() {
        assert_eq!(parse_decimal("1.125"), Some(dec("1.125")));
        assert_eq!(parse_decimal("12,345"), Some(dec("12.345")));
        assert_eq!(parse_decimal("1.000"), Some(dec("1")));
        assert_eq!(parse_decimal("1.234.567,891"), Some(dec("1234567.891")));
    }

    #[test]
    fn test_json_decimal() {
        use serde_json::json;

        assert_eq!(json_decimal(&json!(1.125)), Some(dec("1.125")));
        assert_eq!(json_decimal(&json!(12.345)), Some(dec("12.345")));
        assert_eq!(json_decimal(&json!(1500)), Some(dec("1500")));
        assert_eq!(json_decimal(&json!("4.500,00")), Some(dec("4500.00")));
        assert_eq!(json_decimal(&json!(true)), None);
        assert_eq!(json_decimal(&Value::Null), None);
    }

    #[test]
    fn test_parse_decimal_rejects_non_numbers() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("--"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let d = parse_date("2024-03-15").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 3, 15));

        let d = parse_date("15/03/2024").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 3, 15));

        let d = parse_date("2024-03-15T10:30:00Z").unwrap();
        assert_eq!(d.to_rfc3339(), "2024-03-15T10:30:00+00:00");

        assert!(parse_date("not a date").is_none());
        assert!(parse_date("  ").is_none());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("Sì"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
